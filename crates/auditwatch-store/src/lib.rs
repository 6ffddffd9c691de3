// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Client for the search index holding the access/audit log documents.
//!
//! One bounded, authenticated `_search` call per batch run. Failures are
//! surfaced as [`StoreError`]s for the caller to turn into an error report;
//! retries, if ever wanted, belong to the scheduler, not here.

pub mod error;
pub mod query;

use std::time::Duration;

use tracing::debug;

use auditwatch_engine::SearchResponse;

pub use error::StoreError;
pub use query::{SearchQuery, DEFAULT_RESULT_SIZE};

/// Connection settings for the log store.
#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    /// Base URL of the search cluster, e.g. `https://es.internal:9200`.
    pub url: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout. A slow store fails the run rather than stalling
    /// the schedule.
    pub timeout: Duration,
}

/// The log-store collaborator. Executes one search per call and decodes the
/// result into the engine's typed document model.
#[derive(Debug, Clone)]
pub struct LogStore {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl LogStore {
    pub fn new(config: LogStoreConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "store URL cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(LogStore {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username,
            password: config.password,
        })
    }

    /// Execute `query` against `index` (a concrete name or a wildcard
    /// pattern) and decode the hit batch.
    pub async fn search(
        &self,
        index: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, StoreError> {
        let url = format!("{}/{}/_search", self.base_url, index);
        debug!(index, size = query.size(), "querying log store");

        let response = self
            .client
            .post(&url)
            .query(&[("size", query.size())])
            .basic_auth(&self.username, Some(&self.password))
            .json(&query.body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected { status, body });
        }

        let body = response.text().await?;
        let decoded: SearchResponse =
            serde_json::from_str(&body).map_err(|err| StoreError::Decode(err.to_string()))?;
        debug!(
            hits = decoded.hits.hits.len(),
            total = decoded.hits.total.value,
            "log store query succeeded"
        );
        Ok(decoded)
    }
}
