//! Authoritative savings formulas per finding category.
//!
//! Used when a claimed figure fails the billing invariant and must be
//! recomputed from first principles. Retention formulas always use the
//! storage rate, never the ingestion rate: retained data costs the
//! storage price, whatever it cost to ingest.

use costwise_core::constants::RESERVED_ONE_YEAR_PARTIAL_DISCOUNT;
use costwise_core::types::{Calculation, Finding, FindingCategory, PriceUnit};

use crate::pricing::table::VerifiedPriceTable;

/// Savings fraction for a previous-generation migration.
const PREVIOUS_GENERATION_FRACTION: f64 = 0.10;
/// Savings fraction for a rightsizing (one size down).
const RIGHTSIZING_FRACTION: f64 = 0.50;

/// Recompute a finding's monthly savings from its category's formula.
///
/// Returns `None` when the inputs the formula needs are missing from
/// the finding (or, for idle categories, when there is no usable
/// hourly quote); the caller then falls back to capping.
pub fn authoritative_savings(
    finding: &Finding,
    table: &VerifiedPriceTable,
) -> Option<(f64, Calculation)> {
    match finding.category {
        FindingCategory::LogRetention => {
            let stored_gb = finding.detail_f64("stored_gb")?;
            let price = gb_month_rate(table, "cloudwatch:logs-storage")?;
            Some(quantity_formula("stored_gb", stored_gb, price))
        }
        FindingCategory::SnapshotRetention | FindingCategory::LifecyclePolicy => {
            let storage_gb = finding.detail_f64("storage_gb")?;
            let price = gb_month_rate(table, "rds:snapshot")?;
            Some(quantity_formula("storage_gb", storage_gb, price))
        }
        FindingCategory::UnattachedVolume => {
            let size_gb = finding.detail_f64("size_gb")?;
            let volume_type = finding.detail_str("volume_type").unwrap_or("gp3");
            let price = gb_month_rate(table, &format!("ebs:{volume_type}"))?;
            Some(quantity_formula("size_gb", size_gb, price))
        }
        FindingCategory::PreviousGeneration => {
            fraction_formula(finding, PREVIOUS_GENERATION_FRACTION)
        }
        FindingCategory::Rightsizing => fraction_formula(finding, RIGHTSIZING_FRACTION),
        FindingCategory::ReservedCoverage => {
            fraction_formula(finding, RESERVED_ONE_YEAR_PARTIAL_DISCOUNT)
        }
        FindingCategory::IdleCompute | FindingCategory::IdleDatabase => {
            let quote = finding.pricing_quote.as_ref()?;
            if quote.unit != PriceUnit::PerHour || quote.is_unknown() {
                return None;
            }
            let monthly = quote.monthly_cost_hourly();
            let calculation = Calculation::new(format!(
                "${:.4}/hr * 730 hr",
                quote.unit_price
            ))
            .with_input("unit_price", quote.unit_price)
            .with_input("hours_per_month", 730.0);
            Some((monthly, calculation))
        }
        FindingCategory::Other => None,
    }
}

fn gb_month_rate(table: &VerifiedPriceTable, key: &str) -> Option<f64> {
    let price = table.reference_price(key)?;
    (price.unit == PriceUnit::PerGbMonth).then_some(price.unit_price)
}

fn quantity_formula(input_name: &str, quantity: f64, rate: f64) -> (f64, Calculation) {
    let savings = quantity * rate;
    let calculation = Calculation::new(format!("{quantity} GB * ${rate}/GB-month"))
        .with_input(input_name, quantity)
        .with_input("rate_per_gb_month", rate);
    (savings, calculation)
}

fn fraction_formula(finding: &Finding, fraction: f64) -> Option<(f64, Calculation)> {
    let current = finding.detail_f64("current_monthly_cost")?;
    let savings = current * fraction;
    let calculation = Calculation::new(format!("${current:.2}/month * {fraction}"))
        .with_input("current_monthly_cost", current)
        .with_input("fraction", fraction);
    Some((savings, calculation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use costwise_core::types::{PriceSourceKind, PricingQuote};
    use serde_json::json;

    fn table() -> VerifiedPriceTable {
        VerifiedPriceTable::with_aws_defaults()
    }

    #[test]
    fn test_log_retention_uses_storage_rate() {
        let mut f = Finding::new(
            "LOGS-001",
            "lg-app",
            "observability",
            "cloudwatch",
            FindingCategory::LogRetention,
            110.7,
        );
        f.details.insert("stored_gb".to_string(), json!(221.4));

        let (savings, calc) = authoritative_savings(&f, &table()).unwrap();
        assert!((savings - 6.642).abs() < 1e-9, "221.4 GB at $0.03, got {savings}");
        assert_eq!(calc.inputs.get("rate_per_gb_month"), Some(&0.03));
    }

    #[test]
    fn test_unattached_volume_by_type() {
        let mut f = Finding::new(
            "EBS-002",
            "vol-1",
            "storage",
            "ec2",
            FindingCategory::UnattachedVolume,
            90.0,
        );
        f.details.insert("size_gb".to_string(), json!(500));
        f.details.insert("volume_type".to_string(), json!("gp2"));

        let (savings, _) = authoritative_savings(&f, &table()).unwrap();
        assert!((savings - 50.0).abs() < 1e-9, "500 GB at $0.10");
    }

    #[test]
    fn test_rightsizing_halves_current_cost() {
        let mut f = Finding::new(
            "EC2-005",
            "i-1",
            "compute",
            "ec2",
            FindingCategory::Rightsizing,
            500.0,
        );
        f.details
            .insert("current_monthly_cost".to_string(), json!(280.0));

        let (savings, _) = authoritative_savings(&f, &table()).unwrap();
        assert!((savings - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_idle_needs_hourly_quote() {
        let mut f = Finding::new(
            "EC2-001",
            "i-1",
            "compute",
            "ec2",
            FindingCategory::IdleCompute,
            300.0,
        );
        assert!(authoritative_savings(&f, &table()).is_none(), "no quote yet");

        f.pricing_quote = Some(PricingQuote {
            unit_price: 0.0416,
            unit: PriceUnit::PerHour,
            source: PriceSourceKind::ApiExact,
            query: None,
        });
        let (savings, _) = authoritative_savings(&f, &table()).unwrap();
        assert!((savings - 30.368).abs() < 1e-9);
    }

    #[test]
    fn test_missing_inputs_yield_none() {
        let f = Finding::new(
            "LOGS-001",
            "lg-app",
            "observability",
            "cloudwatch",
            FindingCategory::LogRetention,
            50.0,
        );
        assert!(authoritative_savings(&f, &table()).is_none());
    }
}
