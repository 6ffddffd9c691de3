// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Search request construction.
//!
//! The engine makes no assumption about index names or time windows; both
//! are the calling job's choice, expressed through this builder.

use serde_json::{json, Value};

/// Cap on documents returned per search. The store pages beyond this, but
/// the batch jobs read a single page only.
pub const DEFAULT_RESULT_SIZE: usize = 10_000;

/// A `_search` request body plus its size cap.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    source_fields: Vec<String>,
    range: Option<TimeRange>,
    size: usize,
}

#[derive(Debug, Clone)]
struct TimeRange {
    gte: String,
    lt: String,
}

impl SearchQuery {
    /// A query projecting the given `_source` fields over the whole index.
    pub fn new<I, S>(source_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchQuery {
            source_fields: source_fields.into_iter().map(Into::into).collect(),
            range: None,
            size: DEFAULT_RESULT_SIZE,
        }
    }

    /// Restrict the query to a `@timestamp` range. Accepts the store's
    /// relative date math (`"now-20m"`, `"now"`) or absolute timestamps.
    pub fn with_timestamp_range(mut self, gte: impl Into<String>, lt: impl Into<String>) -> Self {
        self.range = Some(TimeRange {
            gte: gte.into(),
            lt: lt.into(),
        });
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The JSON request body.
    pub fn body(&self) -> Value {
        let mut body = json!({ "_source": self.source_fields });
        if let Some(range) = &self.range {
            body["query"] = json!({
                "range": {
                    "@timestamp": {
                        "gte": range.gte,
                        "lt": range.lt,
                    }
                }
            });
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_without_range_has_no_query_clause() {
        let query = SearchQuery::new(["date", "audit_log", "response"]);
        assert_eq!(
            query.body(),
            json!({"_source": ["date", "audit_log", "response"]})
        );
        assert_eq!(query.size(), DEFAULT_RESULT_SIZE);
    }

    #[test]
    fn test_body_with_relative_window() {
        let query = SearchQuery::new(["date", "audit_log", "response", "source", "geoip"])
            .with_timestamp_range("now-20m", "now")
            .with_size(500);
        assert_eq!(
            query.body(),
            json!({
                "_source": ["date", "audit_log", "response", "source", "geoip"],
                "query": {"range": {"@timestamp": {"gte": "now-20m", "lt": "now"}}}
            })
        );
        assert_eq!(query.size(), 500);
    }
}
