//! Validation errors surfaced per finding.

use super::error_code::{self, CostwiseErrorCode};

/// Hard validation failures on a single finding. The batch continues.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Claimed savings still exceed 110% of service spend after the
    /// recomputation attempt.
    #[error(
        "Finding {check_id} on {resource_id} claims ${claimed:.2}/mo against \
         ${service_spend:.2}/mo total spend for {service}"
    )]
    InvariantViolation {
        check_id: String,
        resource_id: String,
        service: String,
        claimed: f64,
        service_spend: f64,
    },

    /// A dependency probe required for a destructive recommendation was
    /// never run.
    #[error("Dependency probe {probe} was not run for {resource_id}")]
    ProbeUnavailable { probe: String, resource_id: String },
}

impl CostwiseErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvariantViolation { .. } => error_code::INVARIANT_VIOLATION,
            Self::ProbeUnavailable { .. } => error_code::PROBE_UNAVAILABLE,
        }
    }
}
