// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Pure counting and grouping over a document batch.
//!
//! Everything here is order-insensitive in its counts; the one place order
//! matters is `group_by_rule_id`, which records the severity and message of
//! the first entry seen per rule id, so callers must feed it the ordered
//! sequence produced by the flattener.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::Serialize;

use crate::document::{AuditEntry, FlatLogRecord, GeoInfo, LogDocument};

/// The literal filter for access-denial events. Substring match,
/// case-sensitive: a lowercase "access denied" does not count.
const ACCESS_DENIED_MARKER: &str = "Access denied";

/// Count access-denial events per source IP.
pub fn count_access_denied(records: &[FlatLogRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        if record.action.contains(ACCESS_DENIED_MARKER) {
            *counts.entry(record.ip.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Build the IP-to-geo lookup from every document carrying geo data.
///
/// Later documents silently overwrite earlier ones sharing an IP; the batch
/// carries no ordering guarantee, so conflicting geo payloads for one IP
/// resolve to whichever the store returned last.
pub fn build_geo_index(documents: &[LogDocument]) -> HashMap<String, GeoInfo> {
    let mut index = HashMap::new();
    for document in documents {
        if let Some(geo) = &document.geoip {
            index.insert(geo.ip.clone(), geo.clone());
        }
    }
    index
}

/// Count documents per distinct HTTP status, keeping only statuses the
/// pattern matches at the start of the string (prefix-match semantics, not a
/// full match and not a numeric comparison).
pub fn count_http_status(documents: &[LogDocument], pattern: &Regex) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for document in documents {
        let status = &document.response.headers.http_status;
        if matches_prefix(pattern, status) {
            *counts.entry(status.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Anchored prefix match: the pattern must match at the start of the status,
/// trailing text allowed.
pub(crate) fn matches_prefix(pattern: &Regex, status: &str) -> bool {
    pattern.find(status).is_some_and(|found| found.start() == 0)
}

/// Exact per-status frequency table over the whole batch, no filtering.
/// Used by the summary report, unlike the pattern-gated count above.
pub fn count_status_exact(documents: &[LogDocument]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for document in documents {
        *counts
            .entry(document.response.headers.http_status.clone())
            .or_insert(0) += 1;
    }
    counts
}

/// Per-rule aggregate for the summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleBreakdown {
    #[serde(rename = "Count")]
    pub count: usize,
    /// The `action` text of the first entry seen for this rule id. The
    /// ingest pipeline puts severity wording here ("Warning", "Critical").
    #[serde(rename = "Severity")]
    pub severity: String,
    /// The message of the first entry seen for this rule id.
    #[serde(rename = "Message")]
    pub message: String,
}

/// Group audit entries by rule id.
///
/// Count is the group size; severity and message are those of the first
/// entry encountered for the id. Later entries only bump the count.
pub fn group_by_rule_id<'a, I>(entries: I) -> BTreeMap<String, RuleBreakdown>
where
    I: IntoIterator<Item = &'a AuditEntry>,
{
    let mut groups: BTreeMap<String, RuleBreakdown> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(entry.rule_id.clone())
            .and_modify(|breakdown| breakdown.count += 1)
            .or_insert_with(|| RuleBreakdown {
                count: 1,
                severity: entry.action.clone(),
                message: entry.message.clone(),
            });
    }
    groups
}
