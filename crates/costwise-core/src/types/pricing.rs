//! Pricing quotes and the query audit record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::HOURS_PER_MONTH;

/// Which rung of the pricing waterfall produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSourceKind {
    /// Live pricing API matched the exact SKU.
    ApiExact,
    /// Verified static table, reference region only.
    VerifiedTable,
    /// Cost Explorer billing data.
    CostExplorer,
    /// No source resolved. Derived savings must be exactly zero.
    Unknown,
}

impl PriceSourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ApiExact => "api-exact",
            Self::VerifiedTable => "verified-table",
            Self::CostExplorer => "cost-explorer",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PriceSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit the quoted price is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceUnit {
    PerHour,
    PerGbMonth,
    PerUnit,
    PerRequest,
}

/// Structured record of the filters a quote was resolved with.
/// Kept on the quote for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceQuery {
    pub service_code: String,
    pub region: String,
    /// Pricing API location name for the region (e.g. "US East (N. Virginia)").
    pub location: String,
    /// Exact-match filters, in the order they were applied.
    pub filters: Vec<(String, String)>,
}

/// A resolved unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub unit_price: f64,
    pub unit: PriceUnit,
    pub source: PriceSourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<PriceQuery>,
}

impl PricingQuote {
    /// The terminal "no source resolved" quote.
    pub fn unknown() -> Self {
        Self {
            unit_price: 0.0,
            unit: PriceUnit::PerUnit,
            source: PriceSourceKind::Unknown,
            query: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.source == PriceSourceKind::Unknown
    }

    /// Monthly cost for an hourly quote (`unit_price × 730`).
    /// Quantity-denominated units are computed by the caller with the
    /// category-specific formula; an unknown quote is always zero.
    pub fn monthly_cost_hourly(&self) -> f64 {
        if self.is_unknown() || self.unit != PriceUnit::PerHour {
            return 0.0;
        }
        self.unit_price * HOURS_PER_MONTH
    }
}
