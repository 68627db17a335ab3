//! Verified static price table.
//!
//! Entries were captured in the reference region and apply only there:
//! cross-region reuse is forbidden in the waterfall. The same entries
//! double as the authoritative per-unit rates the sanity validator's
//! formula table recomputes with.

use costwise_core::constants::PRICING_REFERENCE_REGION;
use costwise_core::types::PriceUnit;
use rustc_hash::FxHashMap;

/// One verified price entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifiedPrice {
    pub unit_price: f64,
    pub unit: PriceUnit,
}

/// Static table keyed by `family:sku` (see `ResourceSpec::table_key`).
#[derive(Debug, Clone)]
pub struct VerifiedPriceTable {
    reference_region: String,
    entries: FxHashMap<String, VerifiedPrice>,
}

impl VerifiedPriceTable {
    /// Empty table for the given reference region.
    pub fn new(reference_region: impl Into<String>) -> Self {
        Self {
            reference_region: reference_region.into(),
            entries: FxHashMap::default(),
        }
    }

    /// Table seeded with the verified us-east-1 entries.
    pub fn with_aws_defaults() -> Self {
        let mut table = Self::new(PRICING_REFERENCE_REGION);
        table.insert("ebs:gp3", 0.08, PriceUnit::PerGbMonth);
        table.insert("ebs:gp2", 0.10, PriceUnit::PerGbMonth);
        table.insert("ebs:io2", 0.125, PriceUnit::PerGbMonth);
        table.insert("cloudwatch:logs-storage", 0.03, PriceUnit::PerGbMonth);
        table.insert("rds:snapshot", 0.095, PriceUnit::PerGbMonth);
        table
    }

    pub fn insert(&mut self, key: impl Into<String>, unit_price: f64, unit: PriceUnit) {
        self.entries.insert(key.into(), VerifiedPrice { unit_price, unit });
    }

    pub fn reference_region(&self) -> &str {
        &self.reference_region
    }

    /// Region-checked lookup for the pricing waterfall. Returns `None`
    /// outside the reference region, regardless of the key.
    pub fn lookup(&self, key: &str, region: &str) -> Option<VerifiedPrice> {
        if region != self.reference_region {
            return None;
        }
        self.entries.get(key).copied()
    }

    /// Region-independent rate used by the authoritative savings
    /// formulas during recomputation. These are scan-wide reference
    /// rates, not resolved quotes.
    pub fn reference_price(&self, key: &str) -> Option<VerifiedPrice> {
        self.entries.get(key).copied()
    }
}
