//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use fintrack_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Fintrack web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env();
    if !config.allowed_origins.is_empty() {
        println!("   CORS origins: {}", config.allowed_origins.join(", "));
    }
    if config.inline_invalidation {
        println!("   Summary invalidation: inline");
    }

    let db = open_db(db_path)?;

    let static_dir_str = match static_dir {
        Some(dir) => Some(
            dir.to_str()
                .context("Static directory path is not valid UTF-8")?,
        ),
        None => None,
    };

    fintrack_server::serve_with_config(db, host, port, static_dir_str, config).await
}
