//! Activity classification: idle, batch, active, or not enough data.

use costwise_core::config::EngineConfig;
use costwise_core::types::MetricSignal;
use serde::{Deserialize, Serialize};

use super::trend::TrendDirection;

/// The classifier's verdict on a resource's utilization pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityState {
    /// Weighted idle score cleared the threshold.
    Idle,
    /// Low average with high spikes: periodic batch work, not idleness.
    Batch,
    Active,
    /// Fewer than two signals carried data; no verdict is possible.
    InsufficientData,
}

/// Full classification output, kept for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub state: ActivityState,
    /// Weighted idle score over the signals that had data, renormalized
    /// so absent signals influence neither side of the ratio.
    pub idle_score: f64,
    pub signals_with_data: usize,
    /// Signals whose value crossed their threshold in the idle direction.
    pub agreeing_signals: usize,
    /// Idle verdict on a burstable instance whose credit balance is not
    /// recovering. Penalized, not overturned.
    pub burst_risk: bool,
    pub reasons: Vec<String>,
}

/// Batch-workload gate on average CPU: averages above this are just busy.
const BATCH_AVG_CEILING: f64 = 15.0;
/// Batch-workload gate on max CPU: spikes must clear this.
const BATCH_MAX_FLOOR: f64 = 60.0;

/// Classifies signal sets against the configured thresholds.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    idle_score_threshold: f64,
    batch_detection_ratio: f64,
}

impl ActivityClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            idle_score_threshold: config.idle_score_threshold,
            batch_detection_ratio: config.batch_detection_ratio,
        }
    }

    /// Classify one resource's signal set.
    ///
    /// Order matters: the batch pattern is checked before the idle
    /// score, because a batch workload's low average CPU produces a
    /// convincingly high idle score.
    pub fn classify(
        &self,
        signals: &[MetricSignal],
        credit_trend: Option<TrendDirection>,
    ) -> Classification {
        let with_data: Vec<&MetricSignal> = signals.iter().filter(|s| s.has_data()).collect();
        let signals_with_data = with_data.len();

        if signals_with_data < 2 {
            return Classification {
                state: ActivityState::InsufficientData,
                idle_score: 0.0,
                signals_with_data,
                agreeing_signals: 0,
                burst_risk: false,
                reasons: vec![format!(
                    "only {signals_with_data} signal(s) with data, need 2"
                )],
            };
        }

        let mut reasons = Vec::new();

        if let Some((avg, max)) = self.batch_pattern(signals) {
            reasons.push(format!(
                "batch pattern: avg cpu {avg:.1}% with max {max:.1}% (ratio {:.1})",
                max / avg
            ));
            return Classification {
                state: ActivityState::Batch,
                idle_score: 0.0,
                signals_with_data,
                agreeing_signals: 0,
                burst_risk: false,
                reasons,
            };
        }

        let mut weighted_idle = 0.0;
        let mut weight_total = 0.0;
        let mut agreeing_signals = 0;
        for signal in &with_data {
            weight_total += signal.weight;
            if signal.indicates_idle() == Some(true) {
                weighted_idle += signal.weight;
                agreeing_signals += 1;
            }
        }
        let idle_score = if weight_total > 0.0 {
            weighted_idle / weight_total
        } else {
            0.0
        };

        let state = if idle_score >= self.idle_score_threshold {
            reasons.push(format!(
                "idle score {idle_score:.2} >= {:.2} over {signals_with_data} signals",
                self.idle_score_threshold
            ));
            ActivityState::Idle
        } else {
            reasons.push(format!(
                "idle score {idle_score:.2} below {:.2}",
                self.idle_score_threshold
            ));
            ActivityState::Active
        };

        let burst_risk = state == ActivityState::Idle
            && matches!(
                credit_trend,
                Some(TrendDirection::Flat) | Some(TrendDirection::Decreasing)
            );
        if burst_risk {
            reasons.push("credit balance not recovering under idle verdict".to_string());
        } else if state == ActivityState::Idle
            && matches!(credit_trend, Some(TrendDirection::Increasing))
        {
            reasons.push("credit balance recovering, consistent with idle".to_string());
        }

        Classification {
            state,
            idle_score,
            signals_with_data,
            agreeing_signals,
            burst_risk,
            reasons,
        }
    }

    /// Batch pattern: low average CPU, high max CPU, and a max/avg
    /// ratio at or above the configured bound. Returns the (avg, max)
    /// pair when it fires.
    fn batch_pattern(&self, signals: &[MetricSignal]) -> Option<(f64, f64)> {
        let avg = named_value(signals, "cpu_avg_percent")?;
        let max = named_value(signals, "cpu_max_percent")?;
        if avg <= 0.0 {
            return None;
        }
        let fires = avg < BATCH_AVG_CEILING
            && max > BATCH_MAX_FLOOR
            && max / avg >= self.batch_detection_ratio;
        fires.then_some((avg, max))
    }
}

fn named_value(signals: &[MetricSignal], name: &str) -> Option<f64> {
    signals.iter().find(|s| s.name == name).and_then(|s| s.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::catalog::signals_from_observations;
    use rustc_hash::FxHashMap;

    fn observations(pairs: &[(&str, f64)]) -> FxHashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn classifier() -> ActivityClassifier {
        ActivityClassifier::new(&EngineConfig::default())
    }

    #[test]
    fn test_all_signals_idle() {
        let signals = signals_from_observations(&observations(&[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 8.0),
            ("network_out_bytes", 120_000.0),
            ("disk_ops", 5.0),
        ]));
        let c = classifier().classify(&signals, None);
        assert_eq!(c.state, ActivityState::Idle);
        assert_eq!(c.idle_score, 1.0);
        assert_eq!(c.agreeing_signals, 4);
    }

    #[test]
    fn test_absent_signals_renormalize_not_zero() {
        // cpu idle, network missing: score is 0.7/0.85, not 0.7/1.0.
        let signals = signals_from_observations(&observations(&[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 8.0),
            ("disk_ops", 500.0),
        ]));
        let c = classifier().classify(&signals, None);
        assert_eq!(c.signals_with_data, 3);
        assert!(
            (c.idle_score - 0.7 / 0.85).abs() < 1e-9,
            "absent signal excluded from both sides, got {}",
            c.idle_score
        );
        assert_eq!(c.state, ActivityState::Idle);
    }

    #[test]
    fn test_single_signal_is_insufficient() {
        let signals = signals_from_observations(&observations(&[("cpu_avg_percent", 1.0)]));
        let c = classifier().classify(&signals, None);
        assert_eq!(c.state, ActivityState::InsufficientData);
    }

    #[test]
    fn test_batch_pattern_beats_idle_score() {
        // Nightly job: avg well under the idle threshold, spikes to 85%.
        let signals = signals_from_observations(&observations(&[
            ("cpu_avg_percent", 4.0),
            ("cpu_max_percent", 85.0),
            ("network_out_bytes", 90_000.0),
            ("disk_ops", 12.0),
        ]));
        let c = classifier().classify(&signals, None);
        assert_eq!(c.state, ActivityState::Batch);
    }

    #[test]
    fn test_low_ratio_spike_is_not_batch() {
        // Max is elevated but the ratio stays under 4x.
        let signals = signals_from_observations(&observations(&[
            ("cpu_avg_percent", 14.0),
            ("cpu_max_percent", 45.0),
            ("network_out_bytes", 90_000_000.0),
            ("disk_ops", 9_000.0),
        ]));
        let c = classifier().classify(&signals, None);
        assert_eq!(c.state, ActivityState::Active);
    }

    #[test]
    fn test_mixed_signals_below_threshold() {
        // Idle weight 0.4 + 0.15 = 0.55 < 0.60.
        let signals = signals_from_observations(&observations(&[
            ("cpu_avg_percent", 3.0),
            ("cpu_max_percent", 55.0),
            ("network_out_bytes", 80_000_000.0),
            ("disk_ops", 20.0),
        ]));
        let c = classifier().classify(&signals, None);
        assert_eq!(c.state, ActivityState::Active);
        assert!((c.idle_score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_burst_risk_flagged_not_overturned() {
        let signals = signals_from_observations(&observations(&[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 8.0),
            ("network_out_bytes", 50_000.0),
            ("disk_ops", 3.0),
        ]));
        let c = classifier().classify(&signals, Some(TrendDirection::Flat));
        assert_eq!(c.state, ActivityState::Idle, "verdict stands");
        assert!(c.burst_risk, "but the burst risk is recorded");

        let recovering = classifier().classify(&signals, Some(TrendDirection::Increasing));
        assert!(!recovering.burst_risk, "recovering credits clear the risk");
        assert!(
            recovering.reasons.iter().any(|r| r.contains("recovering")),
            "recovering credits leave a trace in the reasons: {:?}",
            recovering.reasons
        );
        assert!(
            classifier().classify(&signals, None).reasons.iter().all(|r| !r.contains("credit")),
            "no credit data, no credit reason"
        );
    }
}
