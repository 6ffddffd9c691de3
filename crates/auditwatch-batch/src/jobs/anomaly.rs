// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Anomaly-detection job: surveil the most recent window and alert only
//! when a signal crosses its threshold.

use tracing::info;

use auditwatch_engine::{detect_anomalies, payload::ANOMALY_JOB_TITLE, SurveillanceConfig};
use auditwatch_store::{LogStore, LogStoreConfig, SearchQuery};

use crate::config::BatchConfig;
use crate::jobs::{self, ANOMALY_SOURCE_FIELDS};

pub async fn run(config: &BatchConfig) -> anyhow::Result<()> {
    let store = LogStore::new(LogStoreConfig {
        url: config.elasticsearch_url.clone(),
        username: config.elasticsearch_id.clone(),
        password: config.elasticsearch_password.clone(),
        timeout: config.request_timeout,
    })?;
    let notifier = jobs::notifier(config)?;

    let index = format!("{}-*", config.index_prefix);
    let window_start = format!("now-{}m", config.query_window_minutes);
    let query =
        SearchQuery::new(ANOMALY_SOURCE_FIELDS).with_timestamp_range(window_start, "now");

    let response = match store.search(&index, &query).await {
        Ok(response) => response,
        Err(err) => return Err(jobs::fail_with_report(&notifier, ANOMALY_JOB_TITLE, err).await),
    };

    let surveillance = SurveillanceConfig::new(
        config.http_status_count_threshold,
        config.access_denied_ip_threshold,
        config.kibana_url.clone(),
    );

    match detect_anomalies(&response, &surveillance)? {
        Some(alert) => {
            info!("threshold crossed, sending alert");
            jobs::deliver(&notifier, &alert).await
        }
        None => {
            info!("no signal crossed its threshold, nothing to report");
            Ok(())
        }
    }
}
