//! CostwiseErrorCode trait for the embedding boundary.

/// Trait for converting engine errors to structured error codes.
/// Every error enum implements this so callers can match on a stable
/// string code rather than a display message.
pub trait CostwiseErrorCode {
    /// Returns the error code string (e.g. "PRICING_THROTTLED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const PRICING_THROTTLED: &str = "PRICING_THROTTLED";
pub const PRICING_BACKEND: &str = "PRICING_BACKEND";
pub const PRICING_TIMEOUT: &str = "PRICING_TIMEOUT";
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";
pub const PROBE_UNAVAILABLE: &str = "PROBE_UNAVAILABLE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
