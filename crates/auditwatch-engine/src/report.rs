// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Descriptive summary of one query window, with no thresholding.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{count_status_exact, group_by_rule_id, RuleBreakdown};
use crate::document::SearchResponse;
use crate::flatten::audit_entries;

/// Shard execution health as reported by the store, re-serialized with the
/// human-facing key names the notification body uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShardHealth {
    #[serde(rename = "Total")]
    pub total: u64,
    #[serde(rename = "Successful")]
    pub successful: u64,
    #[serde(rename = "Skipped")]
    pub skipped: u64,
    #[serde(rename = "Failed")]
    pub failed: u64,
}

/// The daily summary: totals, shard health, exact status frequencies and the
/// per-rule breakdown. Always produced when the query succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub hits_total: u64,
    pub shards: ShardHealth,
    pub status_counts: BTreeMap<String, usize>,
    pub rule_breakdown: BTreeMap<String, RuleBreakdown>,
}

impl SummaryReport {
    pub fn from_response(response: &SearchResponse) -> Self {
        let documents: Vec<_> = response.documents().cloned().collect();
        SummaryReport {
            hits_total: response.hits.total.value,
            shards: ShardHealth {
                total: response.shards.total,
                successful: response.shards.successful,
                skipped: response.shards.skipped,
                failed: response.shards.failed,
            },
            status_counts: count_status_exact(&documents),
            rule_breakdown: group_by_rule_id(audit_entries(&documents)),
        }
    }
}
