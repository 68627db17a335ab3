//! Engine configuration with TOML loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;
use crate::errors::ConfigError;

/// Ceilings of the cost tiers, in monthly dollars.
/// Savings below `low_ceiling` are Low, up to `medium_ceiling` Medium,
/// above it High.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTierThresholds {
    pub low_ceiling: f64,
    pub medium_ceiling: f64,
}

impl Default for CostTierThresholds {
    fn default() -> Self {
        Self {
            low_ceiling: 20.0,
            medium_ceiling: 100.0,
        }
    }
}

/// Retry policy for throttling-class external failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first (default 2 = one retry).
    pub max_attempts: u32,
    /// Fixed backoff before the retry, in milliseconds.
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_ms: 250,
        }
    }
}

/// Top-level engine configuration. Defaults reproduce the documented
/// numeric policies exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cost_tiers: CostTierThresholds,
    /// Findings scoring below this are filtered (default 50).
    pub min_confidence_floor: u8,
    /// Max/avg utilization ratio marking a batch workload (default 4.0).
    pub batch_detection_ratio: f64,
    /// Minimum weighted idle score for an idle verdict (default 0.60).
    pub idle_score_threshold: f64,
    /// Claimed savings above this trigger a live pricing query
    /// (default $100).
    pub api_validation_threshold: f64,
    /// Confidence penalty when billing ground truth is missing
    /// (default 15, applied as −15).
    pub missing_billing_penalty: i16,
    pub retry: RetryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cost_tiers: CostTierThresholds::default(),
            min_confidence_floor: constants::DEFAULT_MIN_CONFIDENCE_FLOOR,
            batch_detection_ratio: constants::DEFAULT_BATCH_DETECTION_RATIO,
            idle_score_threshold: constants::DEFAULT_IDLE_SCORE_THRESHOLD,
            api_validation_threshold: constants::DEFAULT_API_VALIDATION_THRESHOLD,
            missing_billing_penalty: constants::MISSING_BILLING_PENALTY,
            retry: RetryPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency of the numeric policies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cost_tiers.low_ceiling <= 0.0
            || self.cost_tiers.medium_ceiling <= self.cost_tiers.low_ceiling
        {
            return Err(ConfigError::InvalidValue {
                field: "cost_tiers".to_string(),
                message: format!(
                    "ceilings must satisfy 0 < low < medium, got low={} medium={}",
                    self.cost_tiers.low_ceiling, self.cost_tiers.medium_ceiling
                ),
            });
        }
        if self.min_confidence_floor > 100 {
            return Err(ConfigError::InvalidValue {
                field: "min_confidence_floor".to_string(),
                message: format!("must be 0-100, got {}", self.min_confidence_floor),
            });
        }
        if self.batch_detection_ratio < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_detection_ratio".to_string(),
                message: format!("must be >= 1.0, got {}", self.batch_detection_ratio),
            });
        }
        if !(0.0..=1.0).contains(&self.idle_score_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "idle_score_threshold".to_string(),
                message: format!("must be in [0, 1], got {}", self.idle_score_threshold),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_documented_policies() {
        let config = EngineConfig::default();
        assert_eq!(config.cost_tiers.low_ceiling, 20.0);
        assert_eq!(config.cost_tiers.medium_ceiling, 100.0);
        assert_eq!(config.min_confidence_floor, 50);
        assert_eq!(config.batch_detection_ratio, 4.0);
        assert_eq!(config.idle_score_threshold, 0.60);
        assert_eq!(config.api_validation_threshold, 100.0);
        assert_eq!(config.missing_billing_penalty, 15);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.backoff_ms, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            batch_detection_ratio = 5.0

            [retry]
            backoff_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.batch_detection_ratio, 5.0);
        assert_eq!(config.retry.backoff_ms, 500);
        assert_eq!(config.retry.max_attempts, 2, "default preserved");
        assert_eq!(config.cost_tiers.low_ceiling, 20.0, "default preserved");
    }

    #[test]
    fn test_inverted_tier_ceilings_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [cost_tiers]
            low_ceiling = 100.0
            medium_ceiling = 20.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_retry_attempts_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [retry]
            max_attempts = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "idle_score_threshold = 0.7").unwrap();

        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.idle_score_threshold, 0.7);
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let err = EngineConfig::from_path(Path::new("/nonexistent/costwise.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
