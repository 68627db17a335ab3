//! End-to-end pipeline scenarios: idle detection, batch exclusion,
//! retention corrections, billing caps, and unknown pricing.

use costwise_core::config::EngineConfig;
use costwise_core::errors::PricingError;
use costwise_core::types::{
    BillingSnapshot, Finding, FindingCategory, FindingStatus, PriceSourceKind, PriceUnit,
    Resource,
};
use costwise_validation::dependency::{ProbeKind, ProbeOutcome, ProbeResults};
use costwise_validation::pipeline::{BatchContext, ResourceMetrics, ValidationPipeline};
use costwise_validation::pricing::{PriceSource, RawPrice, ResourceSpec};
use rustc_hash::FxHashMap;
use serde_json::json;

/// Fake live source knowing a handful of hourly rates.
struct StubPricing;

impl PriceSource for StubPricing {
    fn quote(&self, spec: &ResourceSpec) -> Result<Option<RawPrice>, PricingError> {
        let rate = match spec.sku.as_str() {
            "t3.medium" => Some(0.0416),
            "m5.xlarge" => Some(0.192),
            _ => None,
        };
        Ok(rate.map(|unit_price| RawPrice {
            unit_price,
            unit: PriceUnit::PerHour,
        }))
    }
}

fn pipeline() -> ValidationPipeline {
    ValidationPipeline::new(EngineConfig::default()).with_price_source(Box::new(StubPricing))
}

fn observations(pairs: &[(&str, f64)]) -> FxHashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn clear_probes() -> ProbeResults {
    ProbeResults::new()
        .with(ProbeKind::AsgMembership, ProbeOutcome::Clear)
        .with(ProbeKind::LoadBalancerTargets, ProbeOutcome::Clear)
}

fn ec2_context(resource_id: &str, age_days: u32, obs: &[(&str, f64)]) -> BatchContext {
    let mut ctx = BatchContext::new();
    let mut resource = Resource::new(resource_id, "ec2-instance", "us-east-1");
    resource.age_days = Some(age_days);
    ctx.add_resource(resource);
    ctx.metrics.insert(
        resource_id.to_string(),
        ResourceMetrics {
            observations: observations(obs),
            credit_history: Vec::new(),
            days_monitored: Some(21),
            idle_days: Some(21),
        },
    );
    ctx.probes.insert(resource_id.to_string(), clear_probes());
    let mut billing = BillingSnapshot::new();
    billing.insert("ec2", 800.0, 10);
    ctx.billing = Some(billing);
    ctx
}

fn idle_ec2_finding(resource_id: &str, claimed: f64) -> Finding {
    let mut f = Finding::new(
        "EC2-001",
        resource_id,
        "compute",
        "ec2",
        FindingCategory::IdleCompute,
        claimed,
    );
    f.details
        .insert("instance_type".to_string(), json!("t3.medium"));
    f
}

#[test]
fn test_established_idle_instance_approved_with_high_confidence() {
    let ctx = ec2_context(
        "i-idle",
        21,
        &[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 8.0),
            ("network_out_bytes", 120_000.0),
            ("disk_ops", 4.0),
        ],
    );
    let out = pipeline().run(vec![idle_ec2_finding("i-idle", 45.0)], &ctx);

    let f = &out.findings[0];
    assert_eq!(f.status, FindingStatus::Approved);
    assert!(f.confidence >= 85, "confidence {}", f.confidence);
    // Claimed $45 corrected to the quote-derived figure.
    assert!((f.monthly_savings - 0.0416 * 730.0).abs() < 1e-9);
    assert_eq!(f.original_estimate, Some(45.0));
    assert_eq!(
        f.pricing_quote.as_ref().unwrap().source,
        PriceSourceKind::ApiExact
    );
}

#[test]
fn test_batch_workload_never_classified_idle() {
    let ctx = ec2_context(
        "i-batch",
        60,
        &[
            ("cpu_avg_percent", 5.0),
            ("cpu_max_percent", 87.0),
            ("network_out_bytes", 90_000.0),
            ("disk_ops", 40.0),
        ],
    );
    let out = pipeline().run(vec![idle_ec2_finding("i-batch", 45.0)], &ctx);

    let f = &out.findings[0];
    assert_eq!(f.status, FindingStatus::Filtered);
    assert!(
        f.skip_reason.as_deref().unwrap().contains("batch"),
        "reason: {:?}",
        f.skip_reason
    );
}

#[test]
fn test_log_retention_corrected_to_storage_rate() {
    let mut ctx = BatchContext::new();
    let mut lg = Resource::new("lg-app", "cloudwatch-logs", "us-east-1");
    lg.age_days = Some(200);
    ctx.add_resource(lg);
    let mut billing = BillingSnapshot::new();
    billing.insert("cloudwatch", 120.0, 8);
    ctx.billing = Some(billing);

    // Claimed at the $0.50/GB ingestion rate instead of storage.
    let mut f = Finding::new(
        "LOGS-001",
        "lg-app",
        "observability",
        "cloudwatch",
        FindingCategory::LogRetention,
        110.7,
    );
    f.details.insert("stored_gb".to_string(), json!(221.4));

    let out = pipeline().run(vec![f], &ctx);
    let f = &out.findings[0];

    assert!((f.monthly_savings - 6.642).abs() < 1e-9, "got {}", f.monthly_savings);
    assert_eq!(f.original_estimate, Some(110.7));
    assert!(f.correction_reason.is_some());
    assert!(out.results[0].correction_applied);
    assert!(
        f.monthly_savings < 110.7,
        "correction must shrink the figure, never inflate it"
    );
}

#[test]
fn test_wild_claim_against_service_spend_recomputed() {
    let mut ctx = BatchContext::new();
    let mut db = Resource::new("db-1", "rds-snapshot", "us-east-1");
    db.age_days = Some(120);
    ctx.add_resource(db);
    let mut billing = BillingSnapshot::new();
    billing.insert("rds", 159.0, 5);
    ctx.billing = Some(billing);

    let mut f = Finding::new(
        "RDS-003",
        "db-1",
        "database",
        "rds",
        FindingCategory::SnapshotRetention,
        594.0,
    );
    f.details.insert("storage_gb".to_string(), json!(800));

    let out = pipeline().run(vec![f], &ctx);
    let f = &out.findings[0];

    // 800 GB at the verified $0.095/GB snapshot rate.
    assert!((f.monthly_savings - 76.0).abs() < 1e-9);
    assert_eq!(f.original_estimate, Some(594.0));
    assert!(out.results[0].correction_applied);
    assert!(f.monthly_savings <= 159.0 * 0.9, "within the multi-resource cap");
}

#[test]
fn test_unknown_sku_zeroes_savings_but_not_confidence() {
    let mut ctx = ec2_context(
        "i-odd",
        30,
        &[
            ("cpu_avg_percent", 1.5),
            ("cpu_max_percent", 6.0),
            ("network_out_bytes", 40_000.0),
            ("disk_ops", 2.0),
        ],
    );
    ctx.billing = None;

    let mut f = Finding::new(
        "EC2-001",
        "i-odd",
        "compute",
        "ec2",
        FindingCategory::IdleCompute,
        250.0,
    );
    f.details
        .insert("instance_type".to_string(), json!("m9x.mystery"));

    let out = pipeline().run(vec![f], &ctx);
    let f = &out.findings[0];

    assert!(f.pricing_unknown);
    assert_eq!(f.monthly_savings, 0.0);
    assert_eq!(f.original_estimate, Some(250.0));
    // The idle verdict is about signals, not prices.
    assert!(f.confidence >= 70, "confidence {}", f.confidence);
}

#[test]
fn test_asg_membership_vetoes_finding() {
    let mut ctx = ec2_context(
        "i-asg",
        40,
        &[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 7.0),
            ("network_out_bytes", 60_000.0),
            ("disk_ops", 3.0),
        ],
    );
    ctx.probes.insert(
        "i-asg".to_string(),
        clear_probes().with(
            ProbeKind::AsgMembership,
            ProbeOutcome::Dependent("asg web-fleet".to_string()),
        ),
    );

    let out = pipeline().run(vec![idle_ec2_finding("i-asg", 45.0)], &ctx);
    let f = &out.findings[0];

    assert_eq!(f.status, FindingStatus::Skipped);
    assert!(f.skip_reason.as_deref().unwrap().contains("web-fleet"));
}

#[test]
fn test_missing_billing_penalizes_whole_batch() {
    let mut ctx = ec2_context(
        "i-idle",
        21,
        &[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 8.0),
            ("network_out_bytes", 120_000.0),
            ("disk_ops", 4.0),
        ],
    );

    let with_billing = pipeline().run(vec![idle_ec2_finding("i-idle", 45.0)], &ctx);
    ctx.billing = None;
    let without_billing = pipeline().run(vec![idle_ec2_finding("i-idle", 45.0)], &ctx);

    // Base 70 +20 consistent +15 multiple = 105, clamped to 100 with
    // billing; the -15 penalty applies before the clamp.
    assert_eq!(with_billing.findings[0].confidence, 100);
    assert_eq!(without_billing.findings[0].confidence, 90);
}

#[test]
fn test_pipeline_is_idempotent() {
    let ctx = ec2_context(
        "i-idle",
        21,
        &[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 8.0),
            ("network_out_bytes", 120_000.0),
            ("disk_ops", 4.0),
        ],
    );
    let findings = vec![idle_ec2_finding("i-idle", 45.0)];

    let first = pipeline().run(findings.clone(), &ctx);
    let second = pipeline().run(findings, &ctx);

    assert_eq!(first.findings, second.findings);
    assert_eq!(first.results, second.results);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn test_burst_risk_penalizes_idle_verdict() {
    let mut ctx = ec2_context(
        "i-burst",
        21,
        &[
            ("cpu_avg_percent", 2.0),
            ("cpu_max_percent", 8.0),
            ("network_out_bytes", 120_000.0),
            ("disk_ops", 4.0),
        ],
    );
    // Credit balance flat at zero: the instance is spending credits.
    ctx.metrics.get_mut("i-burst").unwrap().credit_history = vec![0.0; 10];

    let out = pipeline().run(vec![idle_ec2_finding("i-burst", 45.0)], &ctx);
    let f = &out.findings[0];

    assert_ne!(f.status, FindingStatus::Skipped, "penalized, not reclassified");
    assert!(
        f.confidence <= 80,
        "burst risk must dent the score, got {}",
        f.confidence
    );
}
