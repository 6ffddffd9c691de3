// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Assembles notification envelopes from engine output.
//!
//! The envelope is the only data ever handed to the notifier: a `fallback`
//! title plus a structured JSON body. Successful runs with nothing to say
//! produce no payload at all; failed runs always produce one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::report::SummaryReport;
use crate::surveillance::{AccessDeniedAlert, HttpStatusAlert};

pub const ANOMALY_JOB_TITLE: &str = "Anomaly detection batch";
pub const SUMMARY_JOB_TITLE: &str = "Log summary batch";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The notification envelope consumed by the downstream notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub fallback: String,
    pub body: Value,
}

/// Wrap the two surveillance results into an alert payload.
///
/// Returns `None` when both signals are absent; callers must then skip the
/// notification entirely (quiet windows produce no traffic, not an empty
/// message). A fired signal serializes its alert map; the other side, if
/// absent, appears as `null` in the body.
pub fn format_anomaly(
    dashboard_url: &str,
    http_alerts: Option<BTreeMap<String, HttpStatusAlert>>,
    denied_alerts: Option<BTreeMap<String, AccessDeniedAlert>>,
) -> Option<NotificationPayload> {
    if http_alerts.is_none() && denied_alerts.is_none() {
        return None;
    }

    Some(NotificationPayload {
        fallback: ANOMALY_JOB_TITLE.to_string(),
        body: json!({
            "Kibana URL": dashboard_url,
            "HTTP Status Anomaly detection alert": http_alerts,
            "Access denied surveillance alert": denied_alerts,
        }),
    })
}

/// Wrap a summary report. Always produces a payload.
pub fn format_summary(
    dashboard_url: &str,
    index_name: &str,
    report: &SummaryReport,
) -> NotificationPayload {
    NotificationPayload {
        fallback: SUMMARY_JOB_TITLE.to_string(),
        body: json!({
            "Kibana URL": dashboard_url,
            "Index Name": index_name,
            "Hits Total": report.hits_total,
            "Shards": report.shards,
            "HTTP status code count": report.status_counts,
            "Detailed attack types": report.rule_breakdown,
        }),
    }
}

/// Build the payload reporting an upstream failure. Unlike quiet successes,
/// failures are always surfaced.
pub fn error_report(job_title: &str, detail: &str) -> NotificationPayload {
    error_report_at(job_title, detail, Utc::now())
}

fn error_report_at(job_title: &str, detail: &str, at: DateTime<Utc>) -> NotificationPayload {
    NotificationPayload {
        fallback: format!("{job_title} (Error occurred)"),
        body: json!({
            "timestamp": at.format(TIMESTAMP_FORMAT).to_string(),
            "message": "An error occurred while querying the log store.",
            "detail": {
                "Exception message": detail,
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surveillance::{surveil_access_denied, surveil_http_status};
    use chrono::TimeZone;
    use regex::Regex;
    use std::collections::HashMap;

    #[test]
    fn test_both_signals_absent_suppresses_payload() {
        assert!(format_anomaly("https://kibana.example.com", None, None).is_none());
    }

    #[test]
    fn test_single_signal_produces_payload_with_null_peer() {
        let counts = BTreeMap::from([("503".to_string(), 4)]);
        let pattern = Regex::new(crate::DEFAULT_SERVER_ERROR_PATTERN).unwrap();
        let http_alerts = surveil_http_status(&counts, &pattern, 3);

        let payload = format_anomaly("https://kibana.example.com", http_alerts, None).unwrap();
        assert_eq!(payload.fallback, "Anomaly detection batch");
        assert_eq!(payload.body["Kibana URL"], "https://kibana.example.com");
        assert_eq!(
            payload.body["HTTP Status Anomaly detection alert"]["Alerting 503"]["Count"],
            4
        );
        assert_eq!(payload.body["Access denied surveillance alert"], Value::Null);
    }

    #[test]
    fn test_anomaly_body_carries_denial_alerts() {
        let counts = BTreeMap::from([("1.2.3.4".to_string(), 6)]);
        let denied = surveil_access_denied(&counts, &HashMap::new(), 5);
        let payload = format_anomaly("https://kibana.example.com", None, denied).unwrap();
        let alert = &payload.body["Access denied surveillance alert"]["Access denied 1.2.3.4"];
        assert_eq!(alert["IP"], "1.2.3.4");
        assert_eq!(alert["Geo IP"], Value::Null);
    }

    #[test]
    fn test_error_report_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
        let payload = error_report_at(ANOMALY_JOB_TITLE, "connection refused", at);
        assert_eq!(payload.fallback, "Anomaly detection batch (Error occurred)");
        assert_eq!(payload.body["timestamp"], "2024-05-01 12:30:05");
        assert_eq!(
            payload.body["detail"]["Exception message"],
            "connection refused"
        );
    }

    #[test]
    fn test_payload_json_round_trip() {
        let payload = NotificationPayload {
            fallback: "Anomaly detection batch".to_string(),
            body: json!({
                "nested": {"maps": {"survive": [1, 2, 3]}},
                "nulls": Value::Null,
            }),
        };
        let text = serde_json::to_string(&payload).unwrap();
        let decoded: NotificationPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, payload);
    }
}
