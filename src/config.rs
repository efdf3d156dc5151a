// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Engine configuration and declared resources.
//!
//! [`SyncConfig`] is read from an optional YAML file and then overridden from
//! the environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `CONFIGDNS_ENDPOINT` | `endpoint` |
//! | `CONFIGDNS_ACCESS_TOKEN` | `accessToken` |
//! | `CONFIGDNS_MAX_ATTEMPTS` | `retry.maxAttempts` |
//! | `CONFIGDNS_CONFLICT_INTERVAL_MS` | `retry.conflictIntervalMs` |
//!
//! # Example
//!
//! ```yaml
//! endpoint: https://dns-api.example.net
//! retry:
//!   maxAttempts: 5
//!   conflictIntervalMs: 1000
//! lockGranularity: recordType
//! stateFile: /var/lib/configdns/state.json
//! ```
//!
//! [`Declarations`] is the file the `apply` command reads: the zones to
//! ensure and the record sets to synchronize.

use crate::constants::{
    DEFAULT_CONFLICT_INTERVAL_MILLIS, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STATE_FILE, ENV_ACCESS_TOKEN, ENV_CONFLICT_INTERVAL_MS, ENV_ENDPOINT,
    ENV_MAX_ATTEMPTS,
};
use crate::locks::LockGranularity;
use crate::recordset::RecordSet;
use crate::retry::RetryPolicy;
use crate::zone::Zone;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_conflict_interval_ms() -> u64 {
    DEFAULT_CONFLICT_INTERVAL_MILLIS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

/// Retry budget for remote writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_conflict_interval_ms")]
    pub conflict_interval_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            conflict_interval_ms: DEFAULT_CONFLICT_INTERVAL_MILLIS,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    /// Base URL of the remote DNS configuration API
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub lock_granularity: LockGranularity,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Where synchronized state is persisted
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            retry: RetryConfig::default(),
            lock_granularity: LockGranularity::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            state_file: default_state_file(),
        }
    }
}

impl SyncConfig {
    /// Parses a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this schema.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse configuration")
    }

    /// Loads configuration from `path` (if given) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an environment
    /// override is malformed, or the result does not validate.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read configuration {}", path.display()))?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric override does not parse.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(value) = lookup(ENV_MAX_ATTEMPTS) {
            self.retry.max_attempts = value
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_ATTEMPTS} must be a positive integer"))?;
        }
        if let Some(value) = lookup(ENV_CONFLICT_INTERVAL_MS) {
            self.retry.conflict_interval_ms = value
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CONFLICT_INTERVAL_MS} must be milliseconds"))?;
        }
        Ok(())
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is missing or not an http(s) URL, or
    /// the retry budget is zero.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            bail!("endpoint is required (set it in the configuration file or {ENV_ENDPOINT})");
        }
        let url = Url::parse(self.endpoint.trim())
            .with_context(|| format!("endpoint '{}' is not a valid URL", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("endpoint '{}' must use http or https", self.endpoint);
        }
        if self.retry.max_attempts == 0 {
            bail!("retry.maxAttempts must be at least 1");
        }
        Ok(())
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.conflict_interval_ms),
        )
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Declared zones and record sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declarations {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub records: Vec<RecordSet>,
}

impl Declarations {
    /// Parses a YAML declarations document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not match the schema, including
    /// an unknown `recordType`.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Failed to parse declarations")
    }

    /// Reads and parses a declarations file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read declarations {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("In {}", path.display()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
