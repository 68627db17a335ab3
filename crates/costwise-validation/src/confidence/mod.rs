//! Tiered confidence scoring.
//!
//! The tier gate runs first and can discard a finding outright; only
//! findings that clear their tier's evidentiary minimums receive point
//! adjustments. When four independent perspective assessments exist,
//! fixed-weight aggregation supersedes the additive mode.

pub mod adjustments;
pub mod aggregation;
pub mod engine;
pub mod tiers;

pub use adjustments::EnvironmentKind;
pub use aggregation::PerspectiveScores;
pub use engine::{bucket_status, ConfidenceEngine, ScoreOutcome, ScoringContext};
pub use tiers::TierRequirements;
