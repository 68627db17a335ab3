//! Finding validation engine.
//!
//! Takes unvalidated cost-optimization findings plus raw resource,
//! metric, and billing data and produces corrected, confidence-scored,
//! dependency-safe, priority-ranked findings.
//!
//! Stage order per finding is fixed: pricing → anomaly/dependency →
//! confidence → billing sanity → priority. Across findings there is no
//! ordering; batches fan out over independent findings.

pub mod confidence;
pub mod dependency;
pub mod pipeline;
pub mod pricing;
pub mod priority;
pub mod sanity;
pub mod signals;
