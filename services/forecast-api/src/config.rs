//! Service configuration loading and types.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use forecast_common::DEFAULT_MAX_LEAD_DAYS;

/// Service configuration, loaded from YAML then overridden from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Upstream met.no client settings.
    pub upstream: UpstreamConfig,

    /// Forecast cache settings.
    pub cache: CacheConfig,

    /// Event validation settings.
    pub validation: ValidationConfig,
}

impl ForecastConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &str) -> Result<Self> {
        let file_path = Path::new(path);

        // If the file doesn't exist, fall back to defaults
        if !file_path.exists() {
            tracing::warn!("Config file {} does not exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read: {:?}", file_path))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse: {:?}", file_path))?;

        tracing::info!("Loaded forecast config from {:?}", file_path);
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document is valid and means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply overrides from process environment variables.
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MET_BASE_URL") {
            self.upstream.base_url = v;
        }
        if let Some(v) = lookup("MET_USER_AGENT") {
            self.upstream.user_agent = v;
        }
        if let Some(v) = lookup("MET_REQUEST_TIMEOUT_SECS") {
            self.upstream.request_timeout_secs = parse_var("MET_REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("FORECAST_CACHE_DEFAULT_TTL_SECS") {
            self.cache.default_ttl_secs = parse_var("FORECAST_CACHE_DEFAULT_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("FORECAST_CACHE_WRITE_EXPIRY_SECS") {
            self.cache.write_expiry_secs = parse_var("FORECAST_CACHE_WRITE_EXPIRY_SECS", &v)?;
        }
        if let Some(v) = lookup("FORECAST_CACHE_MAX_ENTRIES") {
            self.cache.max_entries = parse_var("FORECAST_CACHE_MAX_ENTRIES", &v)?;
        }
        if let Some(v) = lookup("FORECAST_MAX_LEAD_DAYS") {
            self.validation.max_lead_days = parse_var("FORECAST_MAX_LEAD_DAYS", &v)?;
        }
        Ok(self)
    }

    /// Reject values the cache and validator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_LEAD_DAYS_LIMIT).contains(&self.validation.max_lead_days) {
            anyhow::bail!(
                "validation.max_lead_days must be between 0 and {}, got {}",
                MAX_LEAD_DAYS_LIMIT,
                self.validation.max_lead_days
            );
        }
        if !(1..=MAX_WRITE_EXPIRY_SECS).contains(&self.cache.write_expiry_secs) {
            anyhow::bail!(
                "cache.write_expiry_secs must be between 1 and {}, got {}",
                MAX_WRITE_EXPIRY_SECS,
                self.cache.write_expiry_secs
            );
        }
        if self.cache.default_ttl_secs > MAX_WRITE_EXPIRY_SECS {
            anyhow::bail!(
                "cache.default_ttl_secs must be at most {}, got {}",
                MAX_WRITE_EXPIRY_SECS,
                self.cache.default_ttl_secs
            );
        }
        Ok(())
    }
}

/// Upper bound for `validation.max_lead_days`.
pub const MAX_LEAD_DAYS_LIMIT: i64 = 366;

/// Upper bound for cache durations: one year.
pub const MAX_WRITE_EXPIRY_SECS: u64 = 366 * 24 * 60 * 60;

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {:?}", name, value))
}

/// Upstream client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Compact locationforecast endpoint, without query string.
    pub base_url: String,

    /// Identifying User-Agent; met.no rejects anonymous clients.
    pub user_agent: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

fn default_base_url() -> String {
    "https://api.met.no/weatherapi/locationforecast/2.0/compact".to_string()
}

fn default_user_agent() -> String {
    format!(
        "event-forecast/{} (https://github.com/yourorg/event-forecast)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Forecast cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Freshness window used when the upstream sends no `Expires` header.
    pub default_ttl_secs: u64,

    /// Entries not written for this long are dropped regardless of freshness.
    pub write_expiry_secs: u64,

    /// Maximum number of cached locations.
    pub max_entries: u64,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn write_expiry(&self) -> Duration {
        Duration::from_secs(self.write_expiry_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 30,
            write_expiry_secs: 2 * 60 * 60,
            max_entries: 10_000,
        }
    }
}

/// Event validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// How far ahead an event may start and still be forecast.
    pub max_lead_days: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_lead_days: DEFAULT_MAX_LEAD_DAYS,
        }
    }
}
