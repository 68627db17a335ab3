//! Pricing backend errors.
//!
//! Only throttling-class failures are retried (once, fixed backoff);
//! everything else fails fast and degrades the finding to an unknown
//! quote.

use super::error_code::{self, CostwiseErrorCode};

/// Errors from the live pricing source.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Pricing backend throttled querying {sku}")]
    Throttled { sku: String },

    #[error("Pricing backend error querying {sku}: {message}")]
    Backend { sku: String, message: String },

    #[error("Pricing query for {sku} timed out after {timeout_ms}ms")]
    Timeout { sku: String, timeout_ms: u64 },
}

impl PricingError {
    /// Whether the failure is throttling-class and eligible for the
    /// single bounded retry.
    pub fn is_throttling(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}

impl CostwiseErrorCode for PricingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Throttled { .. } => error_code::PRICING_THROTTLED,
            Self::Backend { .. } => error_code::PRICING_BACKEND,
            Self::Timeout { .. } => error_code::PRICING_TIMEOUT,
        }
    }
}
