//! Fintrack Web Server
//!
//! Axum-based REST API for the Fintrack personal finance backend.
//!
//! - Income, expense, debt and savings goal CRUD under `/api/v1`
//! - Period summaries backed by the summary cache
//! - Background summary invalidation after income/expense writes
//! - CSV reports, analytics, AI advice and a daily reminder scan
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use fintrack_core::{AdviceClient, Database, Error as CoreError, Granularity};

mod handlers;
mod scheduler;

pub use scheduler::{start_reminder_scheduler, ReminderScheduleConfig};

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Default pagination limit
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Origins allowed when `FINTRACK_ALLOWED_ORIGINS` is not set
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Run summary invalidation before responding instead of in the background.
    /// Closes the window in which a fresh read can see a stale summary.
    pub inline_invalidation: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            inline_invalidation: false,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `FINTRACK_ALLOWED_ORIGINS` (comma separated)
    /// and `FINTRACK_INLINE_INVALIDATION` (`1`/`true`/`on`)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(origins) = std::env::var("FINTRACK_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Ok(flag) = std::env::var("FINTRACK_INLINE_INVALIDATION") {
            config.inline_invalidation = matches!(
                flag.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Advice backend; `None` makes `/advice` answer 503
    pub advice: Option<AdviceClient>,
}

impl AppState {
    /// Invalidate cached summaries covering `dates` at every granularity.
    ///
    /// Runs on the blocking pool. Unless `inline_invalidation` is set the
    /// request does not wait for it, and failures are only logged.
    pub(crate) async fn invalidate_summaries(&self, mut dates: Vec<NaiveDate>) {
        dates.sort();
        dates.dedup();

        let db = self.db.clone();
        let job = move || {
            for date in dates {
                if let Err(e) = db.invalidate_for_date(date, &Granularity::ALL) {
                    warn!(%date, error = %e, "Summary invalidation failed");
                }
            }
        };

        if self.config.inline_invalidation {
            if let Err(e) = tokio::task::spawn_blocking(job).await {
                warn!(error = %e, "Summary invalidation task panicked");
            }
        } else {
            let _ = tokio::task::spawn_blocking(job);
        }
    }
}

/// Create the application router, reading the advice backend from the environment
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let advice = AdviceClient::from_env();
    match advice {
        Some(ref client) => info!("Advice backend configured: {}", client.name()),
        None => info!("Advice backend not configured (set OPENROUTER_API_KEY to enable advice)"),
    }
    create_router_with_advice(db, static_dir, config, advice)
}

/// Create the application router with an explicit advice backend (for testing)
pub fn create_router_with_advice(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    advice: Option<AdviceClient>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        advice,
    });

    let api_routes = Router::new()
        // Income
        .route(
            "/income",
            get(handlers::list_income).post(handlers::create_income),
        )
        .route(
            "/income/:id",
            get(handlers::get_income)
                .put(handlers::update_income)
                .delete(handlers::delete_income),
        )
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        // Debts
        .route("/debts", get(handlers::list_debts).post(handlers::create_debt))
        .route(
            "/debts/:id",
            get(handlers::get_debt)
                .put(handlers::update_debt)
                .delete(handlers::delete_debt),
        )
        // Savings goals
        .route(
            "/savings",
            get(handlers::list_savings_goals).post(handlers::create_savings_goal),
        )
        .route(
            "/savings/:id",
            get(handlers::get_savings_goal)
                .put(handlers::update_savings_goal)
                .delete(handlers::delete_savings_goal),
        )
        // Summaries
        .route("/summary/weekly", get(handlers::weekly_summary))
        .route("/summary/monthly", get(handlers::monthly_summary))
        .route("/summary/yearly", get(handlers::yearly_summary))
        // Advice
        .route("/advice", get(handlers::get_advice))
        // Reports
        .route("/reports/csv", get(handlers::csv_report))
        .route("/reports/pdf", get(handlers::pdf_report))
        // Analytics
        .route(
            "/analytics/expense-categories",
            get(handlers::expense_categories),
        )
        .route(
            "/analytics/income-expense-trend",
            get(handlers::income_expense_trend),
        );

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut app = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.inline_invalidation {
        info!("Summary invalidation runs inline before responses");
    }

    if let Some(reminder_config) = ReminderScheduleConfig::from_env() {
        start_reminder_scheduler(db.clone(), reminder_config);
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Status and client-facing message for a core error, if it is one the
    /// client caused or can act on
    fn classify(err: &CoreError) -> Option<(StatusCode, String)> {
        let status = match err {
            CoreError::InvalidGranularity(_)
            | CoreError::InvalidView(_)
            | CoreError::InvalidData(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            CoreError::AdviceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => return None,
        };
        Some((status, err.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        if let Some((status, message)) = err.downcast_ref::<CoreError>().and_then(Self::classify)
        {
            return Self {
                status,
                message,
                internal: None,
            };
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
