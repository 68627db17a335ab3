//! Shared constants for the costwise validation engine.

/// Costwise version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Average hours per month (365 × 24 / 12), used for hourly-rate conversions.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Region the verified price table entries were captured in.
/// Table entries are valid only for this region.
pub const PRICING_REFERENCE_REGION: &str = "us-east-1";

/// Default claimed-savings threshold above which the live pricing API
/// is consulted. Smaller findings resolve from the verified table.
pub const DEFAULT_API_VALIDATION_THRESHOLD: f64 = 100.0;

/// Default minimum idle score required to classify a resource as idle.
pub const DEFAULT_IDLE_SCORE_THRESHOLD: f64 = 0.60;

/// Default max/avg utilization ratio that marks a batch workload.
pub const DEFAULT_BATCH_DETECTION_RATIO: f64 = 4.0;

/// Default confidence floor below which findings are filtered.
pub const DEFAULT_MIN_CONFIDENCE_FLOOR: u8 = 50;

/// Default confidence assigned by upstream checks when they provide none.
pub const DEFAULT_BASE_CONFIDENCE: u8 = 70;

/// Confidence penalty applied to a whole batch when billing ground
/// truth is unavailable and the sanity validator must be skipped.
pub const MISSING_BILLING_PENALTY: i16 = 15;

/// Savings cap, as a fraction of service spend, for services with
/// three or more resources.
pub const MULTI_RESOURCE_SPEND_CAP: f64 = 0.90;

/// Claimed savings above this multiple of service spend invalidate the
/// finding outright and force recomputation.
pub const SPEND_INVALIDATION_MULTIPLE: f64 = 1.10;

/// One-year partial-upfront reserved instance discount rate.
pub const RESERVED_ONE_YEAR_PARTIAL_DISCOUNT: f64 = 0.46;

/// Average Spot discount relative to on-demand.
pub const SPOT_AVERAGE_DISCOUNT: f64 = 0.70;
