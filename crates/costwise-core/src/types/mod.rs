//! Data model for the validation engine.
//! Resources, metric signals, pricing quotes, findings, billing ground
//! truth, and the engine's output records.

pub mod assessment;
pub mod billing;
pub mod finding;
pub mod pricing;
pub mod resource;
pub mod signal;

pub use assessment::{AdjustmentReason, ConfidenceAssessment, CostTier, ValidationResult};
pub use billing::{normalize_service_name, BillingSnapshot, ServiceSpend};
pub use finding::{Calculation, Finding, FindingCategory, FindingStatus};
pub use pricing::{PriceQuery, PriceSourceKind, PriceUnit, PricingQuote};
pub use resource::{AttachmentState, Lifecycle, Resource};
pub use signal::{MetricSignal, SignalDirection};
