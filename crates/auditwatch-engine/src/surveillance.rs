// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Threshold evaluation turning aggregated counts into alerts.
//!
//! Both evaluators are stateless, compare inclusively (`count >= threshold`
//! fires) and normalize an empty result to `None`, so callers can treat
//! `None` as "nothing to report" without also checking for emptiness.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::Serialize;

use crate::aggregate::matches_prefix;
use crate::document::GeoInfo;

/// One HTTP-status alert. Serialized field names are the wire contract the
/// notifier renders for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpStatusAlert {
    #[serde(rename = "HTTP Status")]
    pub status: String,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Threshold")]
    pub threshold: usize,
}

/// One access-denial alert for a single source IP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessDeniedAlert {
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Threshold")]
    pub threshold: usize,
    /// `null` when no geo lookup exists for the IP.
    #[serde(rename = "Geo IP")]
    pub geo: Option<GeoInfo>,
}

/// Evaluate per-status counts against the threshold.
///
/// Only statuses the pattern matches (anchored prefix, like the counting
/// side) are considered, so a spike in an unwatched status never alerts even
/// when the evaluator is handed unfiltered counts. Every surviving status
/// whose count reaches the threshold yields an entry keyed
/// `"Alerting <status>"`. Returns `None` when no status qualifies.
pub fn surveil_http_status(
    status_counts: &BTreeMap<String, usize>,
    pattern: &Regex,
    threshold: usize,
) -> Option<BTreeMap<String, HttpStatusAlert>> {
    let alerts: BTreeMap<String, HttpStatusAlert> = status_counts
        .iter()
        .filter(|(status, &count)| matches_prefix(pattern, status) && count >= threshold)
        .map(|(status, &count)| {
            (
                format!("Alerting {status}"),
                HttpStatusAlert {
                    status: status.clone(),
                    count,
                    threshold,
                },
            )
        })
        .collect();

    if alerts.is_empty() {
        None
    } else {
        Some(alerts)
    }
}

/// Evaluate per-IP denial counts against the threshold.
///
/// Gating is per IP: only IPs whose own denial count reaches the threshold
/// are reported, each keyed `"Access denied <ip>"` and enriched with geo
/// data when the index has it. Returns `None` when no IP qualifies.
pub fn surveil_access_denied(
    ip_counts: &BTreeMap<String, usize>,
    geo_index: &HashMap<String, GeoInfo>,
    threshold: usize,
) -> Option<BTreeMap<String, AccessDeniedAlert>> {
    let alerts: BTreeMap<String, AccessDeniedAlert> = ip_counts
        .iter()
        .filter(|(_, &count)| count >= threshold)
        .map(|(ip, &count)| {
            (
                format!("Access denied {ip}"),
                AccessDeniedAlert {
                    ip: ip.clone(),
                    count,
                    threshold,
                    geo: geo_index.get(ip).cloned(),
                },
            )
        })
        .collect();

    if alerts.is_empty() {
        None
    } else {
        Some(alerts)
    }
}
