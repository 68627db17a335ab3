//! Point adjustments over the base confidence.
//!
//! Each reason applies at most once per finding; order is irrelevant to
//! the final score and kept only for the audit trail.

use std::sync::LazyLock;

use costwise_core::types::{AdjustmentReason, Resource};
use regex::Regex;
use smallvec::SmallVec;

use crate::dependency::SafetyVerdict;
use crate::signals::Classification;

pub const RESOURCE_NEW_7D_DELTA: i16 = -30;
pub const RESOURCE_NEW_14D_DELTA: i16 = -20;
pub const PRODUCTION_DELTA: i16 = -10;
pub const DEV_TEST_DELTA: i16 = 10;
pub const ASG_MEMBER_DELTA: i16 = -30;
pub const DR_STANDBY_DELTA: i16 = -25;
pub const CONSISTENT_PATTERN_DELTA: i16 = 20;
pub const MULTIPLE_SIGNALS_DELTA: i16 = 15;
pub const SINGLE_SIGNAL_DELTA: i16 = -10;
pub const BURST_RISK_DELTA: i16 = -25;
pub const INSUFFICIENT_DATA_DELTA: i16 = -30;

/// Days of metric history that count as a consistent pattern.
const CONSISTENT_PATTERN_DAYS: u32 = 14;
/// Below this many days of history the verdict is data-starved.
const MIN_MONITORING_DAYS: u32 = 7;

static DEV_TEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(dev|test|testing|staging|sandbox|qa)\b").unwrap());
static PRODUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(prod|production|live|prd)\b").unwrap());
static DR_STANDBY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(dr|standby|backup|failover|replica)\b").unwrap());

/// Environment classification inferred from tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    Production,
    DevTest,
    Unknown,
}

/// Infer the environment from the `Environment`/`env` tags and the
/// resource name. Production wins over dev/test when both match.
pub fn environment_of(resource: &Resource) -> EnvironmentKind {
    let haystack = environment_haystack(resource);
    if PRODUCTION_RE.is_match(&haystack) {
        EnvironmentKind::Production
    } else if DEV_TEST_RE.is_match(&haystack) {
        EnvironmentKind::DevTest
    } else {
        EnvironmentKind::Unknown
    }
}

/// Whether the resource looks like a DR/standby replica.
pub fn is_dr_standby(resource: &Resource) -> bool {
    DR_STANDBY_RE.is_match(&environment_haystack(resource))
}

fn environment_haystack(resource: &Resource) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for key in ["Environment", "env", "Name", "role"] {
        if let Some(v) = resource.tag(key) {
            parts.push(v);
        }
    }
    parts.join(" ")
}

/// Collect every applicable adjustment for a finding.
///
/// `classification: None` for findings whose category carries no
/// utilization signals (retention, unattached volumes); the signal
/// adjustments are skipped for those.
pub fn collect(
    resource: &Resource,
    classification: Option<&Classification>,
    days_monitored: Option<u32>,
    verdict: &SafetyVerdict,
) -> SmallVec<[(AdjustmentReason, i16); 8]> {
    let mut adjustments: SmallVec<[(AdjustmentReason, i16); 8]> = SmallVec::new();

    match resource.age_days {
        Some(age) if age < 7 => {
            adjustments.push((AdjustmentReason::ResourceNew7d, RESOURCE_NEW_7D_DELTA));
        }
        Some(age) if age < 14 => {
            adjustments.push((AdjustmentReason::ResourceNew14d, RESOURCE_NEW_14D_DELTA));
        }
        _ => {}
    }

    match environment_of(resource) {
        EnvironmentKind::Production => {
            adjustments.push((AdjustmentReason::ProductionEnvironment, PRODUCTION_DELTA));
        }
        EnvironmentKind::DevTest => {
            adjustments.push((AdjustmentReason::DevTestEnvironment, DEV_TEST_DELTA));
        }
        EnvironmentKind::Unknown => {}
    }

    if resource.asg_member {
        adjustments.push((AdjustmentReason::AsgMember, ASG_MEMBER_DELTA));
    }
    if is_dr_standby(resource) {
        adjustments.push((AdjustmentReason::DrStandby, DR_STANDBY_DELTA));
    }

    if let Some(c) = classification {
        if c.agreeing_signals >= 2 {
            adjustments.push((AdjustmentReason::MultipleSignals, MULTIPLE_SIGNALS_DELTA));
        } else if c.agreeing_signals == 1 {
            adjustments.push((AdjustmentReason::SingleSignal, SINGLE_SIGNAL_DELTA));
        }
        if c.burst_risk {
            adjustments.push((AdjustmentReason::BurstRisk, BURST_RISK_DELTA));
        }
    }

    match days_monitored {
        Some(days) if days >= CONSISTENT_PATTERN_DAYS => {
            adjustments.push((AdjustmentReason::ConsistentPattern, CONSISTENT_PATTERN_DELTA));
        }
        Some(days) if days < MIN_MONITORING_DAYS => {
            adjustments.push((AdjustmentReason::InsufficientData, INSUFFICIENT_DATA_DELTA));
        }
        _ => {}
    }

    // Dependency penalties carry their own magnitudes from the checker.
    if verdict.confidence_penalty > 0 {
        let reason = if verdict.safety == crate::dependency::Safety::Unknown {
            AdjustmentReason::UnknownDependencies
        } else {
            AdjustmentReason::IacManaged
        };
        adjustments.push((reason, -verdict.confidence_penalty));
    }

    adjustments
}
