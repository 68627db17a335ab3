//! The standard signal catalog.
//!
//! Definitions carry the threshold, weight, and idle direction for each
//! metric the collectors emit. Observations are joined against the
//! catalog by name; a definition with no observation yields a signal
//! with `value: None`, not zero.

use costwise_core::types::{MetricSignal, SignalDirection};
use rustc_hash::FxHashMap;

/// Static definition of one catalog signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDef {
    pub name: &'static str,
    pub unit: &'static str,
    pub threshold: f64,
    pub weight: f64,
    pub idle_when: SignalDirection,
}

/// The compute idle catalog. Weights sum to 1.0 when every signal has
/// data; the classifier renormalizes over the subset that does.
pub const COMPUTE_SIGNALS: &[SignalDef] = &[
    SignalDef {
        name: "cpu_avg_percent",
        unit: "percent",
        threshold: 10.0,
        weight: 0.4,
        idle_when: SignalDirection::Below,
    },
    SignalDef {
        name: "cpu_max_percent",
        unit: "percent",
        threshold: 20.0,
        weight: 0.3,
        idle_when: SignalDirection::Below,
    },
    SignalDef {
        name: "network_out_bytes",
        unit: "bytes",
        threshold: 5_000_000.0,
        weight: 0.15,
        idle_when: SignalDirection::Below,
    },
    SignalDef {
        name: "disk_ops",
        unit: "ops",
        threshold: 100.0,
        weight: 0.15,
        idle_when: SignalDirection::Below,
    },
];

/// Join raw observations against the catalog.
///
/// Every catalog entry produces a signal; missing observations produce
/// `value: None`. Observations not in the catalog are ignored.
pub fn signals_from_observations(observations: &FxHashMap<String, f64>) -> Vec<MetricSignal> {
    COMPUTE_SIGNALS
        .iter()
        .map(|def| MetricSignal {
            name: def.name.to_string(),
            value: observations.get(def.name).copied(),
            unit: def.unit.to_string(),
            threshold: def.threshold,
            weight: def.weight,
            idle_when: def.idle_when,
        })
        .collect()
}
