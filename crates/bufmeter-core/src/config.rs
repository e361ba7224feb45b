use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// When to advance the submitted baseline after an emission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetPolicy {
    /// Reset only if every sink accepted the record; failed deltas are retried.
    #[default]
    OnSuccess,
    /// Reset after every emission attempt, even when delivery failed.
    Always,
}

/// Network delivery of emitted records (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Endpoint that receives each record as a JSON POST.
    pub endpoint: String,
    /// Overall request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl DeliveryConfig {
    /// Endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Engine configuration loaded from `~/.config/bufmeter/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Minimum advance (seconds) of the buffered end between two progress evaluations.
    pub progress_throttle_interval_secs: f64,
    /// Remaining playback time (seconds) at which a time update triggers finalize.
    pub final_probe_threshold_secs: f64,
    /// Gap tolerance (seconds) for merging ranges and for the full-coverage check.
    pub range_merge_epsilon_secs: f64,
    /// Baseline reset behaviour after a failed delivery.
    pub reset_policy: ResetPolicy,
    /// Optional network delivery; if missing, only in-process sinks are used.
    pub delivery: Option<DeliveryConfig>,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            progress_throttle_interval_secs: 0.25,
            final_probe_threshold_secs: 0.2,
            range_merge_epsilon_secs: 0.5,
            reset_policy: ResetPolicy::OnSuccess,
            delivery: None,
        }
    }
}

impl MeterConfig {
    /// Checks every option once, at setup. All durations must be finite and >= 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("progress_throttle_interval_secs", self.progress_throttle_interval_secs),
            ("final_probe_threshold_secs", self.final_probe_threshold_secs),
            ("range_merge_epsilon_secs", self.range_merge_epsilon_secs),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSeconds { name, value });
            }
        }
        if let Some(delivery) = &self.delivery {
            url::Url::parse(&delivery.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
                endpoint: delivery.endpoint.clone(),
                source,
            })?;
            if delivery.timeout_secs == 0 {
                return Err(ConfigError::ZeroTimeout);
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bufmeter")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load and validate configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<MeterConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: MeterConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MeterConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MeterConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = MeterConfig::default();
        assert!((cfg.progress_throttle_interval_secs - 0.25).abs() < 1e-9);
        assert!((cfg.final_probe_threshold_secs - 0.2).abs() < 1e-9);
        assert!((cfg.range_merge_epsilon_secs - 0.5).abs() < 1e-9);
        assert_eq!(cfg.reset_policy, ResetPolicy::OnSuccess);
        assert!(cfg.delivery.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MeterConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MeterConfig = toml::from_str(&toml).unwrap();
        assert_eq!(
            parsed.progress_throttle_interval_secs,
            cfg.progress_throttle_interval_secs
        );
        assert_eq!(parsed.range_merge_epsilon_secs, cfg.range_merge_epsilon_secs);
        assert_eq!(parsed.reset_policy, cfg.reset_policy);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let cfg: MeterConfig = toml::from_str("range_merge_epsilon_secs = 1.0").unwrap();
        assert!((cfg.range_merge_epsilon_secs - 1.0).abs() < 1e-9);
        assert!((cfg.progress_throttle_interval_secs - 0.25).abs() < 1e-9);
        assert!((cfg.final_probe_threshold_secs - 0.2).abs() < 1e-9);
    }

    #[test]
    fn config_toml_reset_policy_and_delivery() {
        let toml = r#"
            reset_policy = "always"

            [delivery]
            endpoint = "https://collector.example.com/buffer"
        "#;
        let cfg: MeterConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.reset_policy, ResetPolicy::Always);
        let delivery = cfg.delivery.as_ref().unwrap();
        assert_eq!(delivery.endpoint, "https://collector.example.com/buffer");
        assert_eq!(delivery.timeout_secs, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn negative_or_nan_values_fail_validation() {
        let mut cfg = MeterConfig::default();
        cfg.progress_throttle_interval_secs = -0.1;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidSeconds {
                name: "progress_throttle_interval_secs",
                ..
            })
        ));

        let mut cfg = MeterConfig::default();
        cfg.range_merge_epsilon_secs = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = MeterConfig::default();
        cfg.final_probe_threshold_secs = 0.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bad_delivery_endpoint_fails_validation() {
        let mut cfg = MeterConfig::default();
        cfg.delivery = Some(DeliveryConfig {
            endpoint: "not a url".to_string(),
            timeout_secs: 10,
        });
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));

        cfg.delivery = Some(DeliveryConfig {
            endpoint: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 0,
        });
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn load_from_path_validates() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "final_probe_threshold_secs = -1.0").unwrap();
        assert!(load_from_path(f.path()).is_err());

        let mut ok = tempfile::NamedTempFile::new().unwrap();
        writeln!(ok, "progress_throttle_interval_secs = 1.5").unwrap();
        let cfg = load_from_path(ok.path()).unwrap();
        assert!((cfg.progress_throttle_interval_secs - 1.5).abs() < 1e-9);
    }
}
