//! The validation pipeline.
//!
//! Per finding the stage order is fixed: pricing → anomaly/dependency →
//! confidence → billing sanity → priority. Across findings there is no
//! ordering; the batch fans out over a rayon pool, sharing only the
//! immutable context. A bad finding degrades itself, never the batch.

use costwise_core::config::EngineConfig;
use costwise_core::constants::DEFAULT_BASE_CONFIDENCE;
use costwise_core::errors::CostwiseErrorCode;
use costwise_core::types::{
    Finding, FindingStatus, Lifecycle, PriceSourceKind, Resource, ValidationResult,
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::context::{BatchContext, BatchOutput, BatchSummary, ResourceMetrics};
use crate::confidence::{bucket_status, ConfidenceEngine, ScoreOutcome, ScoringContext};
use crate::dependency::DependencyChecker;
use crate::pricing::{PriceSource, PricingResolver, ResourceSpec};
use crate::priority::PriorityScorer;
use crate::sanity::{authoritative_savings, SanityValidator};
use crate::signals::{credit_trend, signals_from_observations, ActivityClassifier, ActivityState, Classification};

/// Relative disagreement beyond which a claimed figure is corrected to
/// the independently computed one.
const CORRECTION_TOLERANCE: f64 = 0.05;

pub struct ValidationPipeline {
    config: EngineConfig,
    resolver: PricingResolver,
    classifier: ActivityClassifier,
    checker: DependencyChecker,
    confidence: ConfidenceEngine,
    scorer: PriorityScorer,
}

impl ValidationPipeline {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            resolver: PricingResolver::new(&config),
            classifier: ActivityClassifier::new(&config),
            checker: DependencyChecker::new(),
            confidence: ConfidenceEngine::new(&config),
            scorer: PriorityScorer::new(),
            config,
        }
    }

    /// Attach a live pricing source (the injectable external seam).
    pub fn with_price_source(mut self, source: Box<dyn PriceSource>) -> Self {
        let resolver = std::mem::replace(&mut self.resolver, PricingResolver::new(&self.config));
        self.resolver = resolver.with_source(source);
        self
    }

    /// Validate a batch. Findings fan out over the rayon pool; the
    /// context is shared read-only.
    pub fn run(&self, findings: Vec<Finding>, ctx: &BatchContext) -> BatchOutput {
        let total_original: f64 = findings.iter().map(|f| f.monthly_savings).sum();
        let billing_missing = ctx.billing.is_none();
        if billing_missing {
            tracing::warn!(
                penalty = self.config.missing_billing_penalty,
                "billing snapshot unavailable, sanity validation skipped for the batch"
            );
        }

        let processed: Vec<(Finding, ValidationResult)> = findings
            .into_par_iter()
            .map(|finding| self.process_one(finding, ctx))
            .collect();

        let mut summary = BatchSummary {
            total_original,
            ..BatchSummary::default()
        };
        let mut status_counts: FxHashMap<FindingStatus, usize> = FxHashMap::default();
        for (finding, result) in &processed {
            *status_counts.entry(finding.status).or_insert(0) += 1;
            if finding.status != FindingStatus::Skipped {
                summary.total_corrected += finding.monthly_savings;
            }
            if result.correction_applied {
                summary.corrected_count += 1;
            }
            if finding
                .pricing_quote
                .as_ref()
                .is_some_and(|q| q.source == PriceSourceKind::ApiExact)
            {
                summary.api_validated_count += 1;
            }
            if finding.status == FindingStatus::Approved {
                summary.approved_monthly_savings += finding.monthly_savings;
            }
        }
        summary.status_counts = status_counts;

        tracing::info!(
            findings = processed.len(),
            approved = summary.status_counts.get(&FindingStatus::Approved).copied().unwrap_or(0),
            corrected = summary.corrected_count,
            total_corrected = summary.total_corrected,
            "batch validated"
        );

        let (findings, results): (Vec<_>, Vec<_>) = processed.into_iter().unzip();
        BatchOutput {
            findings,
            results,
            summary,
        }
    }

    /// The single forward pass for one finding.
    fn process_one(&self, mut finding: Finding, ctx: &BatchContext) -> (Finding, ValidationResult) {
        let Some(resource) = ctx.resources.get(&finding.resource_id) else {
            finding.status = FindingStatus::Skipped;
            finding.skip_reason = Some("resource not found in inventory".to_string());
            let result = terminal_result(&finding, true, false);
            return (finding, result);
        };
        let metrics = ctx.metrics.get(&finding.resource_id);

        // Stage 1: pricing.
        let correction_applied_pricing = self.price_stage(&mut finding, resource);
        if finding.status == FindingStatus::Skipped {
            let result = terminal_result(&finding, true, correction_applied_pricing);
            return (finding, result);
        }

        // Stage 2a: anomaly classification, for signal-bearing categories.
        let classification = self.classify_stage(&mut finding, metrics);
        if finding.status == FindingStatus::Filtered {
            let result = terminal_result(&finding, true, correction_applied_pricing);
            return (finding, result);
        }

        // Stage 2b: dependency safety.
        let empty_probes = crate::dependency::ProbeResults::new();
        let probes = ctx.probes.get(&finding.resource_id).unwrap_or(&empty_probes);
        let verdict = self.checker.check(resource, probes);
        if verdict.is_veto() {
            finding.status = FindingStatus::Skipped;
            finding.skip_reason = Some(format!(
                "unsafe to act: {}",
                verdict.reasons.join("; ")
            ));
            let result = terminal_result(&finding, true, correction_applied_pricing);
            return (finding, result);
        }
        if verdict.needs_review() {
            finding.requires_validation = true;
        }

        // Stage 3: confidence.
        let scoring_ctx = ScoringContext {
            resource,
            classification: classification.as_ref(),
            verdict: &verdict,
            days_monitored: metrics.and_then(|m| m.days_monitored),
            perspectives: ctx.perspectives.get(&finding.resource_id).copied(),
        };
        let mut assessment =
            match self
                .confidence
                .score(&finding, DEFAULT_BASE_CONFIDENCE, &scoring_ctx)
            {
                ScoreOutcome::Assessed(a) => a,
                ScoreOutcome::Filtered { tier, reason } => {
                    finding.status = FindingStatus::Filtered;
                    finding.skip_reason =
                        Some(format!("below {tier} tier evidence minimums: {reason}"));
                    let result = terminal_result(&finding, true, correction_applied_pricing);
                    return (finding, result);
                }
            };

        // Stage 4: billing sanity.
        let mut passed_sanity = true;
        let mut correction_applied = correction_applied_pricing;
        match &ctx.billing {
            Some(billing) => {
                let validator = SanityValidator::new(self.resolver.table());
                match validator.validate(&mut finding, billing) {
                    Ok(outcome) => {
                        passed_sanity = outcome.passed;
                        correction_applied |= outcome.correction_applied;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "hard sanity failure");
                        finding.status = FindingStatus::Filtered;
                        finding.skip_reason = Some(e.coded_string());
                        finding.confidence = 0;
                        let result = terminal_result(&finding, false, correction_applied);
                        return (finding, result);
                    }
                }
            }
            None => {
                assessment.penalize(
                    costwise_core::types::AdjustmentReason::MissingBillingData,
                    -self.config.missing_billing_penalty,
                );
            }
        }

        finding.confidence = assessment.final_confidence;
        finding.status = bucket_status(finding.confidence, &self.config);
        if finding.status == FindingStatus::Approved && finding.requires_validation {
            finding.status = FindingStatus::NeedsValidation;
        }
        if finding.status == FindingStatus::Filtered && finding.skip_reason.is_none() {
            finding.skip_reason = Some(format!(
                "confidence {} below floor {}",
                finding.confidence, self.config.min_confidence_floor
            ));
        }

        // Stage 5: priority.
        let idle_days = metrics.and_then(|m| m.idle_days);
        let priority = self.scorer.score(&finding, resource, idle_days);
        finding.priority_score = Some(priority);

        let result = terminal_result(&finding, passed_sanity, correction_applied);
        (finding, result)
    }

    /// Resolve a quote, enforce the unknown-price invariant, and
    /// correct claims that disagree with the independent figure.
    /// Returns whether a correction was applied.
    fn price_stage(&self, finding: &mut Finding, resource: &Resource) -> bool {
        let spec = resource_spec(finding, resource);
        let quote = self.resolver.resolve(&spec, finding.monthly_savings);

        if quote.is_unknown() {
            finding.pricing_quote = Some(quote);
            finding.pricing_unknown = true;
            if finding.monthly_savings != 0.0 {
                finding.apply_correction(0.0, "no pricing source resolved for SKU");
            }
            return finding.original_estimate.is_some();
        }
        finding.pricing_quote = Some(quote);

        let Some((verified, calculation)) = authoritative_savings(finding, self.resolver.table())
        else {
            return false;
        };
        let claimed = finding.monthly_savings;
        let disagrees = if claimed > 0.0 {
            ((claimed - verified) / claimed).abs() > CORRECTION_TOLERANCE
        } else {
            verified > 0.0
        };
        if disagrees {
            finding.apply_correction(
                verified,
                format!("recomputed as {} (claimed ${claimed:.2})", calculation.formula),
            );
            finding.calculation = Some(calculation);
            true
        } else {
            if finding.calculation.is_none() {
                finding.calculation = Some(calculation);
            }
            false
        }
    }

    /// Classify signal-bearing findings; batch workloads are filtered
    /// here. Returns the classification for the confidence stage.
    fn classify_stage(
        &self,
        finding: &mut Finding,
        metrics: Option<&ResourceMetrics>,
    ) -> Option<Classification> {
        if !finding.category.is_idle_category() {
            return None;
        }

        let observations = metrics.map(|m| &m.observations);
        let signals = match observations {
            Some(obs) => signals_from_observations(obs),
            None => signals_from_observations(&FxHashMap::default()),
        };
        let trend = metrics.and_then(|m| credit_trend(&m.credit_history));
        let classification = self.classifier.classify(&signals, trend);

        for signal in &signals {
            if let Some(value) = signal.value {
                finding.signals.insert(signal.name.clone(), value);
            }
        }

        if classification.state == ActivityState::Batch {
            finding.status = FindingStatus::Filtered;
            finding.skip_reason = Some(format!(
                "batch workload, not idle: {}",
                classification.reasons.join("; ")
            ));
        }
        Some(classification)
    }
}

/// Build the pricing spec for a finding from its details and resource.
fn resource_spec(finding: &Finding, resource: &Resource) -> ResourceSpec {
    use costwise_core::types::FindingCategory;

    let sku = finding
        .detail_str("instance_type")
        .or_else(|| finding.detail_str("volume_type"))
        .map(str::to_string)
        .unwrap_or_else(|| match finding.category {
            FindingCategory::LogRetention => "logs-storage".to_string(),
            FindingCategory::SnapshotRetention | FindingCategory::LifecyclePolicy => {
                "snapshot".to_string()
            }
            _ => "unknown".to_string(),
        });

    let mut spec = ResourceSpec::new(resource.kind.clone(), sku, resource.region.clone());
    if let Some(engine) = finding.detail_str("engine") {
        spec = spec.with_attribute(
            "databaseEngine",
            crate::pricing::normalize_db_engine(engine),
        );
    }
    if resource.lifecycle != Lifecycle::OnDemand {
        spec = spec.with_lifecycle(resource.lifecycle);
    }
    spec
}

fn terminal_result(finding: &Finding, passed_sanity: bool, correction_applied: bool) -> ValidationResult {
    ValidationResult {
        check_id: finding.check_id.clone(),
        resource_id: finding.resource_id.clone(),
        passed_sanity_check: passed_sanity,
        correction_applied,
        priority_score: finding.priority_score.unwrap_or(0.0),
        final_status: finding.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costwise_core::types::{FindingCategory, PriceSourceKind};
    use serde_json::json;

    fn pipeline() -> ValidationPipeline {
        ValidationPipeline::new(EngineConfig::default())
    }

    fn volume_resource(id: &str) -> Resource {
        let mut r = Resource::new(id, "ebs-volume", "us-east-1");
        r.age_days = Some(45);
        r
    }

    fn volume_finding(id: &str, claimed: f64) -> Finding {
        let mut f = Finding::new(
            "EBS-002",
            id,
            "storage",
            "ec2",
            FindingCategory::UnattachedVolume,
            claimed,
        );
        f.details.insert("size_gb".to_string(), json!(500));
        f.details.insert("volume_type".to_string(), json!("gp3"));
        f
    }

    #[test]
    fn test_missing_resource_skips_finding() {
        let out = pipeline().run(vec![volume_finding("vol-ghost", 40.0)], &BatchContext::new());
        assert_eq!(out.findings[0].status, FindingStatus::Skipped);
        assert!(out.findings[0].skip_reason.as_deref().unwrap().contains("inventory"));
    }

    #[test]
    fn test_quote_and_recompute_applied() {
        let mut ctx = BatchContext::new();
        ctx.add_resource(volume_resource("vol-1"));
        ctx.billing = Some({
            let mut b = costwise_core::types::BillingSnapshot::new();
            b.insert("ec2", 400.0, 12);
            b
        });

        // 500 GB gp3 is $40/mo; the claim of $62 is off by more than 5%.
        let out = pipeline().run(vec![volume_finding("vol-1", 62.0)], &ctx);
        let f = &out.findings[0];
        assert_eq!(
            f.pricing_quote.as_ref().unwrap().source,
            PriceSourceKind::VerifiedTable
        );
        assert!((f.monthly_savings - 40.0).abs() < 1e-9);
        assert_eq!(f.original_estimate, Some(62.0));
        assert!(out.results[0].correction_applied);
    }

    #[test]
    fn test_unknown_price_zeroes_savings() {
        let mut ctx = BatchContext::new();
        let mut r = Resource::new("i-9", "ec2-instance", "us-east-1");
        r.age_days = Some(90);
        ctx.add_resource(r);

        let mut f = Finding::new(
            "EC2-001",
            "i-9",
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
    }

    #[test]
    fn test_summary_totals() {
        let mut ctx = BatchContext::new();
        ctx.add_resource(volume_resource("vol-1"));
        ctx.add_resource(volume_resource("vol-2"));
        ctx.billing = Some({
            let mut b = costwise_core::types::BillingSnapshot::new();
            b.insert("ec2", 400.0, 12);
            b
        });

        let out = pipeline().run(
            vec![volume_finding("vol-1", 40.0), volume_finding("vol-2", 40.0)],
            &ctx,
        );
        assert_eq!(out.summary.total_original, 80.0);
        assert!((out.summary.total_corrected - 80.0).abs() < 1e-9);
        assert_eq!(out.findings.len(), out.results.len());
    }
}
