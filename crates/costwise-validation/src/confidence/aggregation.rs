//! Multi-perspective confidence aggregation.
//!
//! Four independent assessments of the same finding, combined by a
//! fixed-weight average. When present, this supersedes the additive
//! adjustment mode entirely.

use serde::{Deserialize, Serialize};

const VERIFICATION_WEIGHT: f64 = 0.35;
const QUALITY_WEIGHT: f64 = 0.25;
const CONTEXT_WEIGHT: f64 = 0.25;
const PATTERN_WEIGHT: f64 = 0.15;

/// Independent 0–100 assessments of one finding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveScores {
    /// Does the resource still exist in the claimed state?
    pub verification: u8,
    /// Is the recommendation itself sound?
    pub quality: u8,
    /// Business-context risk of acting on it.
    pub context: u8,
    /// Agreement with historical patterns for this resource class.
    pub pattern: u8,
}

impl PerspectiveScores {
    /// Fixed-weight average, rounded to the nearest point.
    pub fn aggregate(&self) -> u8 {
        let weighted = self.verification as f64 * VERIFICATION_WEIGHT
            + self.quality as f64 * QUALITY_WEIGHT
            + self.context as f64 * CONTEXT_WEIGHT
            + self.pattern as f64 * PATTERN_WEIGHT;
        weighted.round().clamp(0.0, 100.0) as u8
    }
}
