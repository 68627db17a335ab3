//! Batch orchestration: the single forward pass per finding, fanned out
//! over the batch.

pub mod context;
pub mod runner;

pub use context::{BatchContext, BatchOutput, BatchSummary, ResourceMetrics};
pub use runner::ValidationPipeline;
