//! Billing ground truth: per-service monthly spend from Cost Explorer.
//! Immutable for the duration of a scan.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Monthly spend for one service, keyed by normalized service name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpend {
    pub service: String,
    pub monthly_spend: f64,
    /// Provenance of the figure; always `cost-explorer` in practice.
    #[serde(default = "default_spend_source")]
    pub source: String,
}

fn default_spend_source() -> String {
    "cost-explorer".to_string()
}

/// Normalize an AWS service name to the snapshot key: lowercased, with
/// the `Amazon `/`AWS ` vendor prefixes stripped.
pub fn normalize_service_name(name: &str) -> String {
    let trimmed = name.trim();
    let stripped = trimmed
        .strip_prefix("Amazon ")
        .or_else(|| trimmed.strip_prefix("AWS "))
        .unwrap_or(trimmed);
    stripped.to_ascii_lowercase()
}

/// The billing snapshot shared read-only across all pipeline workers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingSnapshot {
    /// Spend per normalized service name.
    pub services: FxHashMap<String, ServiceSpend>,
    /// Number of inventoried resources per normalized service name.
    pub resource_counts: FxHashMap<String, u32>,
}

impl BillingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, service: &str, monthly_spend: f64, resource_count: u32) {
        let key = normalize_service_name(service);
        self.services.insert(
            key.clone(),
            ServiceSpend {
                service: key.clone(),
                monthly_spend,
                source: default_spend_source(),
            },
        );
        self.resource_counts.insert(key, resource_count);
    }

    pub fn spend_for(&self, service: &str) -> Option<&ServiceSpend> {
        self.services.get(&normalize_service_name(service))
    }

    pub fn resource_count(&self, service: &str) -> u32 {
        self.resource_counts
            .get(&normalize_service_name(service))
            .copied()
            .unwrap_or(0)
    }
}
