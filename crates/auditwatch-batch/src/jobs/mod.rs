// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! The two scheduled batch jobs.
//!
//! Both follow the same shape: one store query, pure engine computation,
//! at most one notification. A store failure is always surfaced as an error
//! report before the run fails; a quiet anomaly window sends nothing.

pub mod anomaly;
pub mod summary;

use tracing::{error, warn};

use auditwatch_engine::{payload, NotificationPayload};
use auditwatch_notify::Notifier;
use auditwatch_store::StoreError;

use crate::config::BatchConfig;

/// Source fields the anomaly job projects.
const ANOMALY_SOURCE_FIELDS: [&str; 5] = ["date", "audit_log", "response", "source", "geoip"];

/// Source fields the summary job projects. No `source`/`geoip`: the summary
/// never joins or enriches by IP.
const SUMMARY_SOURCE_FIELDS: [&str; 3] = ["date", "audit_log", "response"];

fn notifier(config: &BatchConfig) -> anyhow::Result<Notifier> {
    Ok(Notifier::new(config.slack_url.clone())?)
}

/// Deliver the error report for a failed store query, then fail the run.
/// Failures are always surfaced; if even the report cannot be delivered the
/// run still exits with the original failure as the cause.
async fn fail_with_report(
    notifier: &Notifier,
    job_title: &str,
    err: StoreError,
) -> anyhow::Error {
    error!("store query failed: {err}");
    let report = payload::error_report(job_title, &err.to_string());
    if let Err(notify_err) = notifier.notify(&report).await {
        warn!("could not deliver error report: {notify_err}");
    }
    anyhow::Error::new(err).context("store query failed")
}

async fn deliver(notifier: &Notifier, payload: &NotificationPayload) -> anyhow::Result<()> {
    notifier
        .notify(payload)
        .await
        .map_err(|err| anyhow::Error::new(err).context("notification delivery failed"))
}
