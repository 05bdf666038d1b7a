// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::dashboard::{BinningPolicy, DashboardSettings, DEFAULT_BUCKET_SIZE, DEFAULT_WEEKLY_THRESHOLD};
use crate::kpi::DEFAULT_LOW_CONFIDENCE_THRESHOLD;

pub const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/dashboard.toml";
pub const DEFAULT_JSON_PATH: &str = "config/dashboard.json";

const ENV_BIND_ADDR: &str = "DASHBOARD_BIND_ADDR";
const ENV_DATA_PATH: &str = "DASHBOARD_DATA_PATH";
const ENV_BUCKET_SIZE: &str = "DASHBOARD_BUCKET_SIZE";
const ENV_WEEKLY_THRESHOLD: &str = "DASHBOARD_WEEKLY_THRESHOLD";
const ENV_LOW_CONFIDENCE: &str = "DASHBOARD_LOW_CONFIDENCE";
const ENV_METRICS: &str = "DASHBOARD_METRICS";

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}
fn default_data_path() -> PathBuf {
    PathBuf::from("data/consultation.json")
}
fn default_weekly_threshold() -> usize {
    DEFAULT_WEEKLY_THRESHOLD
}
fn default_bucket_size() -> usize {
    DEFAULT_BUCKET_SIZE.get()
}
fn default_low_confidence() -> f64 {
    DEFAULT_LOW_CONFIDENCE_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// JSON dataset read by `JsonFileSource`.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Bucket the trend chart once the daily series is longer than this.
    #[serde(default = "default_weekly_threshold")]
    pub weekly_threshold: usize,
    #[serde(default = "default_bucket_size")]
    pub bucket_size: usize,
    #[serde(default = "default_low_confidence")]
    pub low_confidence_threshold: f64,
    #[serde(default)]
    pub metrics_enabled: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_path: default_data_path(),
            weekly_threshold: default_weekly_threshold(),
            bucket_size: default_bucket_size(),
            low_confidence_threshold: default_low_confidence(),
            metrics_enabled: false,
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit path. Supports TOML or JSON by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg: DashboardConfig = match ext.as_str() {
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("parsing JSON config {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("parsing TOML config {}", path.display()))?,
        };
        Ok(cfg.sanitized())
    }

    /// Resolve config using env var + fallbacks, then apply env overrides:
    /// 1) $DASHBOARD_CONFIG_PATH
    /// 2) config/dashboard.toml
    /// 3) config/dashboard.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new(DEFAULT_TOML_PATH).exists() {
            Self::load_from(Path::new(DEFAULT_TOML_PATH))?
        } else if Path::new(DEFAULT_JSON_PATH).exists() {
            Self::load_from(Path::new(DEFAULT_JSON_PATH))?
        } else {
            tracing::debug!("no dashboard config file found, using defaults");
            Self::default()
        };
        Ok(base.with_env_overrides().sanitized())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_string(ENV_BIND_ADDR) {
            self.bind_addr = v;
        }
        if let Some(v) = env_string(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(v);
        }
        if let Some(v) = env_parse::<usize>(ENV_BUCKET_SIZE) {
            self.bucket_size = v;
        }
        if let Some(v) = env_parse::<usize>(ENV_WEEKLY_THRESHOLD) {
            self.weekly_threshold = v;
        }
        if let Some(v) = env_parse::<f64>(ENV_LOW_CONFIDENCE) {
            self.low_confidence_threshold = v;
        }
        if let Some(v) = env_string(ENV_METRICS) {
            self.metrics_enabled = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "on");
        }
        self
    }

    /// Replace out-of-range values with defaults instead of failing.
    fn sanitized(mut self) -> Self {
        if self.bucket_size == 0 {
            tracing::warn!("bucket_size 0 is invalid, falling back to {}", default_bucket_size());
            self.bucket_size = default_bucket_size();
        }
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            tracing::warn!(
                value = self.low_confidence_threshold,
                "low_confidence_threshold outside [0, 1], using default"
            );
            self.low_confidence_threshold = default_low_confidence();
        }
        self
    }

    pub fn settings(&self) -> DashboardSettings {
        let bucket_size = NonZeroUsize::new(self.bucket_size).unwrap_or(DEFAULT_BUCKET_SIZE);
        DashboardSettings {
            binning: BinningPolicy {
                threshold: self.weekly_threshold,
                bucket_size,
            },
            low_confidence_threshold: self.low_confidence_threshold,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable env override");
            None
        }
    }
}
