//! Test utilities for fintrack-core
//!
//! A mock OpenRouter server that answers chat-completion requests locally.

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// API key the mock server accepts
pub const MOCK_API_KEY: &str = "test-key";

/// Mock OpenRouter server for testing and development
pub struct MockOpenRouterServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOpenRouterServer {
    /// Start a server that answers every request successfully
    pub async fn start() -> Self {
        Self::start_with_status(StatusCode::OK).await
    }

    /// Start a server whose chat endpoint always answers with `status`
    pub async fn start_with_status(status: StatusCode) -> Self {
        let app = Router::new()
            .route("/api/v1/chat/completions", post(handle_chat))
            .with_state(status);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOpenRouterServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_chat(
    State(status): State<StatusCode>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", MOCK_API_KEY))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid api key" })),
        );
    }

    if status != StatusCode::OK {
        return (status, Json(serde_json::json!({ "error": "mock failure" })));
    }

    let prompt = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    let content = if prompt.contains("Net Balance -") {
        "Spending exceeded income. Cut discretionary costs first."
    } else {
        "You are saving money. Keep an emergency fund of three months."
    };

    let response = ChatResponse {
        model: request.model,
        choices: vec![Choice {
            message: Message {
                role: "assistant".to_string(),
                content: content.to_string(),
            },
        }],
    };
    (
        StatusCode::OK,
        Json(serde_json::to_value(response).unwrap_or_default()),
    )
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    model: String,
    choices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
struct Choice {
    message: Message,
}
