//! Burst-credit trend detection.
//!
//! Burstable instances with low average CPU can still be doing real
//! work; a flat or falling credit balance under an idle verdict means
//! the instance is spending credits and the verdict is suspect.

use serde::{Deserialize, Serialize};

/// Direction of a credit-balance series over the observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Flat,
}

/// Relative slope below which a series counts as flat.
const FLAT_BAND: f64 = 0.02;

/// Classify a credit-balance history (oldest first).
///
/// Returns `None` with fewer than two samples; callers treat that as
/// no burst evidence rather than a flat trend.
pub fn credit_trend(history: &[f64]) -> Option<TrendDirection> {
    if history.len() < 2 {
        return None;
    }

    let slope = regression_slope(history);
    let mean = history.iter().sum::<f64>() / history.len() as f64;
    if mean.abs() < f64::EPSILON {
        // Balance pinned at zero: credits fully spent.
        return Some(TrendDirection::Flat);
    }

    let relative = slope / mean;
    Some(if relative > FLAT_BAND {
        TrendDirection::Increasing
    } else if relative < -FLAT_BAND {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Flat
    })
}

/// Least-squares slope over sample index.
fn regression_slope(series: &[f64]) -> f64 {
    let n = series.len() as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;

    for (i, &y) in series.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denom = n * sum_x2 - sum_x * sum_x;
    if denom.abs() < 1e-10 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denom
}
