//! Engine configuration: every numeric policy with a documented default.

pub mod engine_config;

pub use engine_config::{CostTierThresholds, EngineConfig, RetryPolicy};
