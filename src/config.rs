use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub webhook_url: Option<String>,
    #[serde(rename = "prCondition", alias = "pr_condition")]
    pub pr_condition: PrFilter,
    /// IANA zone used for the "Created At" fact
    pub time_zone: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: None,
            pr_condition: PrFilter::Any,
            time_zone: "Europe/Berlin".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Which opened pull requests produce a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum PrFilter {
    #[default]
    Any,
    /// Only pull requests coming from a fork
    OnlyExternal,
}

impl From<&str> for PrFilter {
    fn from(value: &str) -> Self {
        match value {
            "onlyExternal" => PrFilter::OnlyExternal,
            _ => PrFilter::Any,
        }
    }
}

impl From<String> for PrFilter {
    fn from(value: String) -> Self {
        PrFilter::from(value.as_str())
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.timeout_secs == 0 {
            anyhow::bail!(
                "timeout_secs must be greater than zero in {}",
                path.display()
            );
        }

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Apply action inputs on top of the file values. Blank inputs are ignored.
    pub fn with_overrides(mut self, webhook_url: Option<String>, pr_condition: Option<String>) -> Self {
        if let Some(url) = webhook_url.filter(|u| !u.trim().is_empty()) {
            self.webhook_url = Some(url);
        }
        if let Some(condition) = pr_condition.filter(|c| !c.trim().is_empty()) {
            self.pr_condition = PrFilter::from(condition);
        }
        self
    }

    /// The configured webhook URL; it must be present and non-empty
    pub fn webhook_url(&self) -> Result<&str> {
        match self.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => anyhow::bail!("webhook_url is required (pass --webhook-url or set INPUT_WEBHOOK_URL)"),
        }
    }

    pub fn time_zone(&self) -> Result<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| anyhow::anyhow!("'{}' is not a valid IANA timezone", self.time_zone))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
