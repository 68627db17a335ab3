//! The pricing resolution waterfall.
//!
//! `resolve` never fails for "not found": when neither the live source
//! nor the verified table answers, it returns the terminal unknown
//! quote with a zero unit price.

use std::time::Duration;

use costwise_core::config::{EngineConfig, RetryPolicy};
use costwise_core::constants::{RESERVED_ONE_YEAR_PARTIAL_DISCOUNT, SPOT_AVERAGE_DISCOUNT};
use costwise_core::types::{Lifecycle, PriceQuery, PriceSourceKind, PriceUnit, PricingQuote};

use super::source::{location_name, PriceSource, RawPrice, ResourceSpec};
use super::table::VerifiedPriceTable;

/// Resolves unit prices through the ordered waterfall.
pub struct PricingResolver {
    source: Option<Box<dyn PriceSource>>,
    table: VerifiedPriceTable,
    retry: RetryPolicy,
    api_threshold: f64,
}

impl PricingResolver {
    /// Resolver with the default verified table and no live source.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            source: None,
            table: VerifiedPriceTable::with_aws_defaults(),
            retry: config.retry.clone(),
            api_threshold: config.api_validation_threshold,
        }
    }

    /// Attach a live pricing source.
    pub fn with_source(mut self, source: Box<dyn PriceSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the verified table.
    pub fn with_table(mut self, table: VerifiedPriceTable) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &VerifiedPriceTable {
        &self.table
    }

    /// Resolve a unit price for the exact SKU.
    ///
    /// Live queries are reserved for findings whose claimed savings
    /// exceed the API threshold; smaller findings resolve from the
    /// verified table first and only fall back to the live source on a
    /// table miss. The waterfall terminates in an unknown quote —
    /// never an interpolated or family-averaged price.
    pub fn resolve(&self, spec: &ResourceSpec, claimed_savings: f64) -> PricingQuote {
        let live_first = claimed_savings > self.api_threshold;

        if live_first {
            if let Some(quote) = self.query_live(spec) {
                return quote;
            }
        }

        if let Some(price) = self.table.lookup(&spec.table_key(), &spec.region) {
            tracing::debug!(
                key = %spec.table_key(),
                price = price.unit_price,
                "resolved from verified table"
            );
            return self.finish_quote(
                spec,
                RawPrice {
                    unit_price: price.unit_price,
                    unit: price.unit,
                },
                PriceSourceKind::VerifiedTable,
            );
        }

        if !live_first {
            if let Some(quote) = self.query_live(spec) {
                return quote;
            }
        }

        tracing::debug!(sku = %spec.sku, region = %spec.region, "no pricing source resolved");
        PricingQuote::unknown()
    }

    /// Query the live source with a single bounded retry for
    /// throttling-class failures only.
    fn query_live(&self, spec: &ResourceSpec) -> Option<PricingQuote> {
        let source = self.source.as_ref()?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match source.quote(spec) {
                Ok(Some(raw)) => {
                    return Some(self.finish_quote(spec, raw, PriceSourceKind::ApiExact));
                }
                Ok(None) => return None,
                Err(e) if e.is_throttling() && attempt < self.retry.max_attempts => {
                    tracing::debug!(sku = %spec.sku, attempt, "pricing throttled, backing off");
                    std::thread::sleep(Duration::from_millis(self.retry.backoff_ms));
                }
                Err(e) => {
                    tracing::warn!(sku = %spec.sku, error = %e, "live pricing query failed");
                    return None;
                }
            }
        }
    }

    fn finish_quote(
        &self,
        spec: &ResourceSpec,
        raw: RawPrice,
        source: PriceSourceKind,
    ) -> PricingQuote {
        let unit_price = lifecycle_rate(raw.unit_price, raw.unit, spec.lifecycle);
        PricingQuote {
            unit_price,
            unit: raw.unit,
            source,
            query: Some(build_query(spec)),
        }
    }
}

/// Apply the billing-lifecycle discount to hourly compute rates.
/// Reserved and Spot resources must never be priced on-demand.
fn lifecycle_rate(unit_price: f64, unit: PriceUnit, lifecycle: Lifecycle) -> f64 {
    if unit != PriceUnit::PerHour {
        return unit_price;
    }
    match lifecycle {
        Lifecycle::OnDemand => unit_price,
        Lifecycle::Reserved => unit_price * (1.0 - RESERVED_ONE_YEAR_PARTIAL_DISCOUNT),
        Lifecycle::Spot => unit_price * (1.0 - SPOT_AVERAGE_DISCOUNT),
    }
}

/// Build the audit record of the filters the quote was resolved with.
fn build_query(spec: &ResourceSpec) -> PriceQuery {
    let mut filters: Vec<(String, String)> = Vec::new();
    match spec.resource_type.as_str() {
        "ec2-instance" => {
            filters.push(("instanceType".to_string(), spec.sku.clone()));
            filters.push(("operatingSystem".to_string(), "Linux".to_string()));
            filters.push(("tenancy".to_string(), "Shared".to_string()));
            filters.push(("preInstalledSw".to_string(), "NA".to_string()));
            filters.push(("capacitystatus".to_string(), "Used".to_string()));
        }
        "rds-instance" => {
            filters.push(("instanceType".to_string(), spec.sku.clone()));
            filters.push(("deploymentOption".to_string(), "Single-AZ".to_string()));
        }
        "ebs-volume" => {
            filters.push(("volumeApiName".to_string(), spec.sku.clone()));
        }
        _ => {
            filters.push(("sku".to_string(), spec.sku.clone()));
        }
    }
    for (key, value) in &spec.attributes {
        filters.push((key.clone(), value.clone()));
    }

    PriceQuery {
        service_code: service_code(&spec.resource_type).to_string(),
        region: spec.region.clone(),
        location: location_name(&spec.region).to_string(),
        filters,
    }
}

fn service_code(resource_type: &str) -> &'static str {
    match resource_type {
        "ec2-instance" | "ebs-volume" => "AmazonEC2",
        "rds-instance" | "rds-snapshot" => "AmazonRDS",
        "cloudwatch-logs" => "AmazonCloudWatch",
        _ => "AmazonEC2",
    }
}
