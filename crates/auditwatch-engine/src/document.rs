// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Typed model of the documents returned by the log store.
//!
//! The shapes here mirror the `_source` projection the batch jobs request:
//! `date`, `audit_log`, `response`, `source`, `geoip`. Field names on the
//! wire are snake_case strings chosen by the ingest pipeline and are mapped
//! onto Rust names with `#[serde(rename)]` where they differ.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One retrieved log document.
///
/// `audit_log` is a map of small integer strings ("0", "1", ...) to audit
/// entries and may be empty. `source` and `geoip` are only present when the
/// query projects them; the summary job deliberately omits both.
#[derive(Debug, Clone, Deserialize)]
pub struct LogDocument {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub audit_log: BTreeMap<String, AuditEntry>,
    pub response: ResponseInfo,
    #[serde(default)]
    pub source: Option<SourceInfo>,
    #[serde(default, deserialize_with = "empty_map_as_none")]
    pub geoip: Option<GeoInfo>,
}

/// One rule-triggered event recorded on a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuditEntry {
    /// Rule identifier.
    #[serde(rename = "id")]
    pub rule_id: String,
    /// Free text; carries severity-like wording and, for denials, the
    /// literal substring "Access denied".
    pub action: String,
    /// Human-readable description.
    #[serde(rename = "message2")]
    pub message: String,
}

/// The response sub-document. Only the HTTP status reaches the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseInfo {
    pub headers: ResponseHeaders,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseHeaders {
    /// Three-digit status code as text, e.g. "503".
    pub http_status: String,
}

/// Request source information. The ingest pipeline attaches more fields than
/// the engine reads; only `ip` participates in aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceInfo {
    pub ip: String,
}

/// Geo metadata resolved for a source IP. Everything besides `ip` is passed
/// through untouched into alert payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoInfo {
    pub ip: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, Value>,
}

/// The log store sends `"geoip": {}` when no lookup happened. Treat that the
/// same as an absent field so downstream code only sees real geo data.
fn empty_map_as_none<'de, D>(deserializer: D) -> Result<Option<GeoInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = serde_json::Map::deserialize(deserializer)?;
    if map.is_empty() {
        return Ok(None);
    }
    serde_json::from_value(Value::Object(map))
        .map(Some)
        .map_err(D::Error::custom)
}

/// Top-level search result as the store returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
    #[serde(rename = "_shards")]
    pub shards: ShardStats,
}

impl SearchResponse {
    /// The document batch, stripped of hit envelopes, in result order.
    pub fn documents(&self) -> impl Iterator<Item = &LogDocument> {
        self.hits.hits.iter().map(|hit| &hit.source)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits {
    pub hits: Vec<Hit>,
    pub total: HitsTotal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source")]
    pub source: LogDocument,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HitsTotal {
    pub value: u64,
}

/// Per-shard execution health reported alongside the hits.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ShardStats {
    pub total: u64,
    pub successful: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// The flat join of one audit entry with its parent document's source info.
///
/// Built by explicit field selection rather than a generic map merge: on a
/// name collision the source side wins, which is why `ip` is always taken
/// from `source` even if a rule were to emit a field of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLogRecord {
    pub rule_id: String,
    pub action: String,
    pub message: String,
    pub ip: String,
}
