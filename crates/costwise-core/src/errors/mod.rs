//! Error taxonomy for the validation engine.
//!
//! Every failure is scoped to the single finding being processed; no
//! bad input aborts a batch. "No price found" is a state
//! (`PricingQuote::unknown()`), not an error.

pub mod config_error;
pub mod error_code;
pub mod pricing_error;
pub mod validation_error;

pub use config_error::ConfigError;
pub use error_code::CostwiseErrorCode;
pub use pricing_error::PricingError;
pub use validation_error::ValidationError;
