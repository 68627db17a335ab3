//! Cloud resource inventory records.
//!
//! Owned by the inventory collector outside the engine; the engine only
//! reads them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing lifecycle of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    #[default]
    OnDemand,
    Spot,
    Reserved,
}

impl Lifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OnDemand => "on-demand",
            Self::Spot => "spot",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attachment state for attachable resources (volumes, ENIs, EIPs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentState {
    Attached,
    Detached,
    /// The resource kind has no attachment concept.
    #[default]
    NotApplicable,
}

/// A cloud resource as reported by the inventory collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Provider-assigned identifier (e.g. `i-0abc123`).
    pub id: String,
    /// Resource kind (e.g. `ec2-instance`, `ebs-volume`, `nat-gateway`).
    pub kind: String,
    pub region: String,
    /// Creation timestamp, RFC 3339, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Age in days at scan time, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_days: Option<u32>,
    #[serde(default)]
    pub tags: FxHashMap<String, String>,
    #[serde(default)]
    pub asg_member: bool,
    #[serde(default)]
    pub attachment: AttachmentState,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Resource {
    /// Minimal resource with no tags and default flags.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            region: region.into(),
            created_at: None,
            age_days: None,
            tags: FxHashMap::default(),
            asg_member: false,
            attachment: AttachmentState::default(),
            lifecycle: Lifecycle::default(),
        }
    }

    /// Case-insensitive tag lookup.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether any tag marks the resource as managed by infrastructure
    /// as code (CloudFormation, Terraform, Pulumi).
    pub fn is_iac_managed(&self) -> bool {
        self.tags.keys().any(|k| {
            let k = k.to_ascii_lowercase();
            k.starts_with("aws:cloudformation")
                || k.contains("terraform")
                || k.starts_with("pulumi")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_resource(tags: &[(&str, &str)]) -> Resource {
        Resource {
            id: "i-0abc".to_string(),
            kind: "ec2-instance".to_string(),
            region: "us-east-1".to_string(),
            created_at: None,
            age_days: Some(30),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            asg_member: false,
            attachment: AttachmentState::NotApplicable,
            lifecycle: Lifecycle::OnDemand,
        }
    }

    #[test]
    fn test_tag_lookup_case_insensitive() {
        let r = make_resource(&[("Environment", "prod")]);
        assert_eq!(r.tag("environment"), Some("prod"));
        assert_eq!(r.tag("Env"), None);
    }

    #[test]
    fn test_iac_detection() {
        let cfn = make_resource(&[("aws:cloudformation:stack-name", "web")]);
        assert!(cfn.is_iac_managed());

        let tf = make_resource(&[("ManagedByTerraform", "true")]);
        assert!(tf.is_iac_managed());

        let plain = make_resource(&[("Name", "web-1")]);
        assert!(!plain.is_iac_managed());
    }

    #[test]
    fn test_lifecycle_default_is_on_demand() {
        let r: Resource = serde_json::from_str(
            r#"{"id":"i-1","kind":"ec2-instance","region":"us-east-1"}"#,
        )
        .unwrap();
        assert_eq!(r.lifecycle, Lifecycle::OnDemand);
    }
}
