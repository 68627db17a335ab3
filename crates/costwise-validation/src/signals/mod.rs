//! Utilization signal collection and activity classification.
//!
//! Raw metric observations become typed `MetricSignal`s via the
//! catalog, then the classifier turns a signal set into one of four
//! activity states. Absent signals stay absent throughout: they never
//! contribute zero to any score.

pub mod catalog;
pub mod classifier;
pub mod trend;

pub use catalog::{signals_from_observations, SignalDef};
pub use classifier::{ActivityClassifier, ActivityState, Classification};
pub use trend::{credit_trend, TrendDirection};
