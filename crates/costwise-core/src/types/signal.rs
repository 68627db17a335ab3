//! Typed utilization signals with explicit "no data" semantics.

use serde::{Deserialize, Serialize};

/// Which side of the threshold indicates idleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalDirection {
    /// Values below the threshold indicate idleness (CPU, network, IOPS).
    Below,
    /// Values above the threshold indicate idleness (e.g. burst credit balance).
    Above,
}

/// One normalized metric observation for a resource.
///
/// `value: None` is a first-class "no data" state, distinct from zero.
/// It must never be coerced to zero: absent signals are excluded from
/// both the numerator and denominator of the idle score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSignal {
    pub name: String,
    pub value: Option<f64>,
    pub unit: String,
    pub threshold: f64,
    pub weight: f64,
    pub idle_when: SignalDirection,
}

impl MetricSignal {
    pub fn has_data(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the measured value crosses the threshold in the idle
    /// direction. `None` when there is no data.
    pub fn indicates_idle(&self) -> Option<bool> {
        let value = self.value?;
        Some(match self.idle_when {
            SignalDirection::Below => value < self.threshold,
            SignalDirection::Above => value > self.threshold,
        })
    }
}
