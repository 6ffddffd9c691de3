// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Environment-sourced configuration for the batch jobs.
//!
//! The environment is read exactly once, here; everything downstream —
//! including the engine — receives explicit structs built from this.

use std::env;
use std::time::Duration;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_INDEX_PREFIX: &str = "nginx";
const DEFAULT_QUERY_WINDOW_MINUTES: u64 = 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{name} must be an integer, got '{value}'")]
    NotAnInteger { name: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything a batch run needs, resolved from the environment.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Base URL of the search cluster.
    pub elasticsearch_url: String,
    pub elasticsearch_id: String,
    pub elasticsearch_password: String,
    /// Incoming-webhook URL for notifications.
    pub slack_url: String,
    /// Dashboard link included verbatim in payloads.
    pub kibana_url: String,
    /// Minimum per-status count for an HTTP-status alert.
    pub http_status_count_threshold: usize,
    /// Minimum per-IP denial count for an access-denial alert.
    pub access_denied_ip_threshold: usize,
    /// Index name prefix; the anomaly job queries `<prefix>-*`, the summary
    /// job `<prefix>-YYYY-MM-DD`.
    pub index_prefix: String,
    /// Relative window the anomaly job looks back over.
    pub query_window_minutes: u64,
    /// Timeout applied to each outbound request.
    pub request_timeout: Duration,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl BatchConfig {
    /// Read and validate the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = BatchConfig {
            elasticsearch_url: required("ELASTICSEARCH_URL")?,
            elasticsearch_id: required("ELASTICSEARCH_ID")?,
            elasticsearch_password: required("ELASTICSEARCH_PASSWORD")?,
            slack_url: required("SLACK_URL")?,
            kibana_url: required("KIBANA_URL")?,
            http_status_count_threshold: required_usize("HTTP_STATUS_COUNT_THRESHOLD")?,
            access_denied_ip_threshold: required_usize("ACCESS_DENIED_IP_THRESHOLD")?,
            index_prefix: env::var("INDEX_PREFIX")
                .unwrap_or_else(|_| DEFAULT_INDEX_PREFIX.to_string()),
            query_window_minutes: optional_u64(
                "QUERY_WINDOW_MINUTES",
                DEFAULT_QUERY_WINDOW_MINUTES,
            )?,
            request_timeout: Duration::from_secs(optional_u64(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            log_level: env::var("LOG_LEVEL")
                .map(|val| val.to_lowercase())
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "INDEX_PREFIX cannot be empty".to_string(),
            ));
        }

        if self.query_window_minutes == 0 {
            return Err(ConfigError::Invalid(
                "QUERY_WINDOW_MINUTES must be greater than 0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn required_usize(name: &'static str) -> Result<usize, ConfigError> {
    let value = required(name)?;
    value
        .parse()
        .map_err(|_| ConfigError::NotAnInteger { name, value })
}

fn optional_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::NotAnInteger { name, value }),
        Err(_) => Ok(default),
    }
}
