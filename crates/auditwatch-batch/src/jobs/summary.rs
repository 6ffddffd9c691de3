// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Log-summary job: a daily descriptive report over yesterday's index,
//! always delivered, never thresholded.

use chrono::{Duration, Utc};
use tracing::info;

use auditwatch_engine::{payload::SUMMARY_JOB_TITLE, summarize};
use auditwatch_store::{LogStore, LogStoreConfig, SearchQuery};

use crate::config::BatchConfig;
use crate::jobs::{self, SUMMARY_SOURCE_FIELDS};

pub async fn run(config: &BatchConfig) -> anyhow::Result<()> {
    let store = LogStore::new(LogStoreConfig {
        url: config.elasticsearch_url.clone(),
        username: config.elasticsearch_id.clone(),
        password: config.elasticsearch_password.clone(),
        timeout: config.request_timeout,
    })?;
    let notifier = jobs::notifier(config)?;

    let index = yesterday_index(&config.index_prefix);
    let query = SearchQuery::new(SUMMARY_SOURCE_FIELDS);

    let response = match store.search(&index, &query).await {
        Ok(response) => response,
        Err(err) => return Err(jobs::fail_with_report(&notifier, SUMMARY_JOB_TITLE, err).await),
    };

    let report = summarize(&response, &config.kibana_url, &index);
    info!(index, "sending daily summary");
    jobs::deliver(&notifier, &report).await
}

/// Daily indices are named `<prefix>-YYYY-MM-DD`; the job runs just after
/// midnight and reports on the day that closed.
fn yesterday_index(prefix: &str) -> String {
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    format!("{}-{}", prefix, yesterday.format("%Y-%m-%d"))
}
