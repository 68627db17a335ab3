//! Core types, errors, and configuration for the costwise validation engine.
//!
//! Shared between the validation engine and any embedding caller: the data
//! model (resources, signals, findings, billing ground truth), the error
//! taxonomy, engine configuration, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::{CostTierThresholds, EngineConfig, RetryPolicy};
pub use errors::{ConfigError, CostwiseErrorCode, PricingError, ValidationError};
pub use types::{
    AttachmentState, BillingSnapshot, Calculation, ConfidenceAssessment, CostTier, Finding,
    FindingCategory, FindingStatus, Lifecycle, MetricSignal, PriceQuery, PriceSourceKind,
    PriceUnit, PricingQuote, Resource, ServiceSpend, SignalDirection, ValidationResult,
};
