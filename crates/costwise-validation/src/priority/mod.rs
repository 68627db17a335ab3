//! Priority ranking of validated findings.

pub mod scorer;

pub use scorer::{PriorityBucket, PriorityScorer};
