//! Mock advice backend for tests and offline development

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::FinancialSummary;

use super::AdviceBackend;

/// Returns canned advice derived from the summary's net balance
#[derive(Clone, Default)]
pub struct MockAdviceBackend {
    /// When set, every call fails with this message
    pub failure: Option<String>,
}

impl MockAdviceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl AdviceBackend for MockAdviceBackend {
    async fn advise(&self, summary: &FinancialSummary) -> Result<String> {
        if let Some(ref message) = self.failure {
            return Err(Error::Advice(message.clone()));
        }

        let advice = if summary.net_balance >= 0.0 {
            format!(
                "You kept {:.2} this period. Consider moving part of it into savings.",
                summary.net_balance
            )
        } else {
            format!(
                "You overspent by {:.2} this period. Review your largest expense categories.",
                -summary.net_balance
            )
        };
        Ok(advice)
    }
}
