//! AI-generated financial advice
//!
//! - `AdviceBackend` trait: turns a period summary into a few sentences of advice
//! - `AdviceClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenRouterBackend`, `MockAdviceBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `FINTRACK_ADVICE_BACKEND`: `openrouter` (default) or `mock`
//! - `OPENROUTER_API_KEY`: API key (required for openrouter)
//! - `OPENROUTER_MODEL`: Model name (default: mistralai/mistral-7b-instruct:free)
//! - `OPENROUTER_HOST`: Base URL (default: https://openrouter.ai)

mod mock;
mod openrouter;

pub use mock::MockAdviceBackend;
pub use openrouter::OpenRouterBackend;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FinancialSummary;

#[async_trait]
pub trait AdviceBackend: Send + Sync {
    /// Advice for the period described by `summary`
    async fn advise(&self, summary: &FinancialSummary) -> Result<String>;
}

/// Prompt sent to the language model for a summary
pub fn advice_prompt(summary: &FinancialSummary) -> String {
    format!(
        "Given this financial summary: Total Income {:.2}, Total Expenses {:.2}, \
         Net Balance {:.2} for the period {} to {}, provide concise financial advice \
         in 2-3 short sentences.",
        summary.total_income,
        summary.total_expenses,
        summary.net_balance,
        summary.period_start,
        summary.period_end,
    )
}

/// Configured advice backend
#[derive(Clone)]
pub enum AdviceClient {
    OpenRouter(OpenRouterBackend),
    Mock(MockAdviceBackend),
}

impl AdviceClient {
    /// Build a client from environment variables.
    ///
    /// Returns None when no backend is configured.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("FINTRACK_ADVICE_BACKEND").unwrap_or_else(|_| "openrouter".to_string());

        match backend.to_lowercase().as_str() {
            "openrouter" => OpenRouterBackend::from_env().map(AdviceClient::OpenRouter),
            "mock" => Some(AdviceClient::Mock(MockAdviceBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown FINTRACK_ADVICE_BACKEND, falling back to openrouter");
                OpenRouterBackend::from_env().map(AdviceClient::OpenRouter)
            }
        }
    }

    pub fn mock() -> Self {
        AdviceClient::Mock(MockAdviceBackend::new())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdviceClient::OpenRouter(_) => "openrouter",
            AdviceClient::Mock(_) => "mock",
        }
    }
}

#[async_trait]
impl AdviceBackend for AdviceClient {
    async fn advise(&self, summary: &FinancialSummary) -> Result<String> {
        match self {
            AdviceClient::OpenRouter(b) => b.advise(summary).await,
            AdviceClient::Mock(b) => b.advise(summary).await,
        }
    }
}
