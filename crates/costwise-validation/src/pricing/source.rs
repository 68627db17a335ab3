//! The injectable live pricing source and the query it is asked.

use costwise_core::errors::PricingError;
use costwise_core::types::{Lifecycle, PriceUnit};
use serde::{Deserialize, Serialize};

/// What to price: the exact SKU of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Resource family and kind (e.g. `ec2-instance`, `ebs-volume`,
    /// `cloudwatch-logs`).
    pub resource_type: String,
    /// The SKU within the family: instance type, volume type, or a
    /// family-specific key like `logs-storage`.
    pub sku: String,
    pub region: String,
    /// Exact-match attributes beyond the SKU (OS, tenancy, database
    /// engine, deployment option).
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl ResourceSpec {
    pub fn new(
        resource_type: impl Into<String>,
        sku: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            sku: sku.into(),
            region: region.into(),
            attributes: Vec::new(),
            lifecycle: Lifecycle::OnDemand,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Key into the verified price table: `family:sku`, where the
    /// family is the leading segment of the resource type
    /// (`ebs-volume` → `ebs:gp3`).
    pub fn table_key(&self) -> String {
        let family = self
            .resource_type
            .split('-')
            .next()
            .unwrap_or(&self.resource_type);
        format!("{}:{}", family, self.sku)
    }
}

/// A unit price as returned by a live source, before any audit record
/// or lifecycle adjustment is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPrice {
    pub unit_price: f64,
    pub unit: PriceUnit,
}

/// Injectable live pricing backend.
///
/// `Ok(None)` means the backend answered but holds no matching SKU —
/// the waterfall proceeds to the verified table. Errors are classified
/// by `PricingError::is_throttling` for the single bounded retry.
pub trait PriceSource: Send + Sync {
    fn quote(&self, spec: &ResourceSpec) -> Result<Option<RawPrice>, PricingError>;
}

/// Pricing API location name for a region code. Unmapped regions fall
/// back to N. Virginia, matching the API's own default behavior.
pub fn location_name(region: &str) -> &'static str {
    match region {
        "us-east-1" => "US East (N. Virginia)",
        "us-east-2" => "US East (Ohio)",
        "us-west-1" => "US West (N. California)",
        "us-west-2" => "US West (Oregon)",
        "eu-west-1" => "EU (Ireland)",
        "eu-central-1" => "EU (Frankfurt)",
        "ap-southeast-1" => "Asia Pacific (Singapore)",
        "ap-northeast-1" => "Asia Pacific (Tokyo)",
        _ => "US East (N. Virginia)",
    }
}

/// Normalize a database engine name to the pricing catalog's spelling.
pub fn normalize_db_engine(engine: &str) -> &'static str {
    match engine.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => "PostgreSQL",
        "mysql" => "MySQL",
        "mariadb" => "MariaDB",
        "aurora-postgresql" => "Aurora PostgreSQL",
        "aurora-mysql" => "Aurora MySQL",
        _ => "PostgreSQL",
    }
}
