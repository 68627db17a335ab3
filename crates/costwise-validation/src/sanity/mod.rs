//! Billing sanity validation.
//!
//! Cross-checks a finding's claimed savings against the independent
//! per-service billing totals, with resource-count-aware capping and
//! formula-based recomputation for wildly wrong claims.

pub mod formulas;
pub mod validator;

pub use formulas::authoritative_savings;
pub use validator::{SanityOutcome, SanityValidator};
