//! Per-tier evidentiary minimums.
//!
//! Bigger dollar claims need more evidence. The gate runs before any
//! point adjustment and discards findings that fail it regardless of
//! what their score would have been.

use costwise_core::types::CostTier;

/// Minimum evidence a tier demands before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRequirements {
    /// Minimum resource age in days. Unknown age fails the gate.
    pub min_age_days: u32,
    /// Minimum agreeing utilization signals, where signals apply.
    pub min_agreeing_signals: usize,
}

impl TierRequirements {
    pub fn for_tier(tier: CostTier) -> Self {
        match tier {
            CostTier::Low => Self {
                min_age_days: 3,
                min_agreeing_signals: 1,
            },
            CostTier::Medium => Self {
                min_age_days: 7,
                min_agreeing_signals: 2,
            },
            CostTier::High => Self {
                min_age_days: 14,
                min_agreeing_signals: 2,
            },
        }
    }

    /// Check the gate. `agreeing_signals: None` means signals do not
    /// apply to this finding's category and the signal minimum is
    /// waived; an unknown resource age always fails.
    pub fn check(
        &self,
        age_days: Option<u32>,
        agreeing_signals: Option<usize>,
    ) -> Result<(), String> {
        match age_days {
            None => return Err("resource age unknown".to_string()),
            Some(age) if age < self.min_age_days => {
                return Err(format!(
                    "resource age {age}d below tier minimum {}d",
                    self.min_age_days
                ));
            }
            Some(_) => {}
        }
        if let Some(agreeing) = agreeing_signals {
            if agreeing < self.min_agreeing_signals {
                return Err(format!(
                    "{agreeing} agreeing signal(s), tier requires {}",
                    self.min_agreeing_signals
                ));
            }
        }
        Ok(())
    }
}
