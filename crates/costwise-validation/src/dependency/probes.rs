//! Dependency probe results.
//!
//! Probes run outside the engine (they are the injectable seam for
//! tests); the checker only consumes their results. A probe that was
//! never run simply has no entry.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The dependency probes the checker knows how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeKind {
    /// Is the instance a member of an auto-scaling group?
    AsgMembership,
    /// Does the NAT gateway appear in any route table?
    NatGatewayRoutes,
    /// Is the resource a healthy target of a load balancer?
    LoadBalancerTargets,
    /// Is the resource managed by an infrastructure-as-code stack?
    IacManagement,
}

impl ProbeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AsgMembership => "asg-membership",
            Self::NatGatewayRoutes => "nat-gateway-routes",
            Self::LoadBalancerTargets => "load-balancer-targets",
            Self::IacManagement => "iac-management",
        }
    }

    /// Probes expected for a given resource kind. Expected-but-missing
    /// results make the verdict Unknown.
    pub fn expected_for(resource_kind: &str) -> &'static [ProbeKind] {
        match resource_kind {
            "ec2-instance" => &[Self::AsgMembership, Self::LoadBalancerTargets],
            "nat-gateway" => &[Self::NatGatewayRoutes],
            "rds-instance" => &[Self::LoadBalancerTargets],
            _ => &[],
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What one probe found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "outcome", content = "detail")]
pub enum ProbeOutcome {
    /// No dependency found.
    Clear,
    /// A live dependency exists; the detail names it.
    Dependent(String),
}

/// Probe results for one resource, keyed by probe kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeResults {
    results: FxHashMap<ProbeKind, ProbeOutcome>,
}

impl ProbeResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, probe: ProbeKind, outcome: ProbeOutcome) {
        self.results.insert(probe, outcome);
    }

    pub fn with(mut self, probe: ProbeKind, outcome: ProbeOutcome) -> Self {
        self.record(probe, outcome);
        self
    }

    /// `None` means the probe was not run.
    pub fn outcome(&self, probe: ProbeKind) -> Option<&ProbeOutcome> {
        self.results.get(&probe)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
