//! Dependency safety vetoes.
//!
//! A finding that is numerically sound can still be operationally
//! dangerous to act on. Probes report what a resource is wired into;
//! the checker folds probe results into a safety verdict that can veto
//! or demote the finding. A probe that did not run yields Unknown,
//! never Safe.

pub mod checker;
pub mod probes;

pub use checker::{DependencyChecker, Safety, SafetyVerdict};
pub use probes::{ProbeKind, ProbeOutcome, ProbeResults};
