// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Log aggregation and threshold-surveillance engine.
//!
//! Turns a raw batch of audit-log documents into grouped counts, geo
//! enrichment joins and pass/fail alert decisions against configured
//! thresholds, plus the descriptive daily summary. Pure and synchronous:
//! every entry point takes explicit inputs and configuration, reads no
//! environment and holds no state between calls. The log store and the
//! notifier are external collaborators handled by sibling crates.

pub mod aggregate;
pub mod document;
pub mod error;
pub mod flatten;
pub mod payload;
pub mod report;
pub mod surveillance;

use regex::Regex;
use tracing::debug;

pub use document::SearchResponse;
pub use error::EngineError;
pub use payload::NotificationPayload;
pub use report::SummaryReport;

/// Statuses the anomaly job watches by default: server-error codes, matched
/// as a prefix of the textual status.
pub const DEFAULT_SERVER_ERROR_PATTERN: &str = "5[0-9]{2}";

/// Configuration the surveillance entry point consumes. Built once per run
/// from the caller's environment handling; the engine itself never reads
/// ambient state.
#[derive(Debug, Clone)]
pub struct SurveillanceConfig {
    /// Minimum per-status count for an HTTP-status alert (inclusive).
    pub http_status_count_threshold: usize,
    /// Minimum per-IP denial count for an access-denial alert (inclusive).
    pub access_denied_ip_threshold: usize,
    /// Dashboard link passed through untouched into payloads.
    pub dashboard_url: String,
    /// Anchored-prefix pattern selecting which statuses are surveilled.
    pub status_pattern: Regex,
}

impl SurveillanceConfig {
    pub fn new(
        http_status_count_threshold: usize,
        access_denied_ip_threshold: usize,
        dashboard_url: String,
    ) -> Self {
        #[allow(clippy::expect_used)]
        let status_pattern =
            Regex::new(DEFAULT_SERVER_ERROR_PATTERN).expect("default status pattern is valid");
        SurveillanceConfig {
            http_status_count_threshold,
            access_denied_ip_threshold,
            dashboard_url,
            status_pattern,
        }
    }
}

/// Run both surveillance signals over one query result and wrap them into a
/// notification payload.
///
/// `Ok(None)` means a quiet window: nothing crossed its threshold and no
/// notification must be sent.
pub fn detect_anomalies(
    response: &SearchResponse,
    config: &SurveillanceConfig,
) -> Result<Option<NotificationPayload>, EngineError> {
    let documents: Vec<_> = response.documents().cloned().collect();
    debug!(documents = documents.len(), "evaluating surveillance signals");

    let status_counts = aggregate::count_http_status(&documents, &config.status_pattern);
    let http_alerts = surveillance::surveil_http_status(
        &status_counts,
        &config.status_pattern,
        config.http_status_count_threshold,
    );

    let records = flatten::flatten(&documents)?;
    let denial_counts = aggregate::count_access_denied(&records);
    let geo_index = aggregate::build_geo_index(&documents);
    let denied_alerts = surveillance::surveil_access_denied(
        &denial_counts,
        &geo_index,
        config.access_denied_ip_threshold,
    );

    Ok(payload::format_anomaly(
        &config.dashboard_url,
        http_alerts,
        denied_alerts,
    ))
}

/// Build the daily summary payload for one query result. Always produces a
/// payload; summaries are never suppressed.
pub fn summarize(
    response: &SearchResponse,
    dashboard_url: &str,
    index_name: &str,
) -> NotificationPayload {
    let report = SummaryReport::from_response(response);
    payload::format_summary(dashboard_url, index_name, &report)
}
