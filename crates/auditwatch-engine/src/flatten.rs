// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

//! Joins audit-log entries with their parent document's source info.
//!
//! The `audit_log` map is keyed by small integer strings. The store does not
//! guarantee map iteration order, so the walk here sorts keys numerically to
//! make "first entry for a rule id" well-defined downstream. Non-numeric keys
//! (which the ingest pipeline should never produce) sort after the numeric
//! ones, lexicographically.

use crate::document::{AuditEntry, FlatLogRecord, LogDocument};
use crate::error::EngineError;

/// Flatten every audit-log entry in the batch into one record joined with the
/// parent document's source fields.
///
/// Produces exactly `sum(doc.audit_log.len())` records. A document that
/// carries audit entries but no `source` sub-document is a contract violation
/// by the store and fails the whole run.
pub fn flatten(documents: &[LogDocument]) -> Result<Vec<FlatLogRecord>, EngineError> {
    let mut records = Vec::new();

    for document in documents {
        if document.audit_log.is_empty() {
            continue;
        }
        let source = document.source.as_ref().ok_or_else(|| {
            EngineError::DataContract(
                "document has audit_log entries but no source sub-document".to_string(),
            )
        })?;

        for (_, entry) in ordered_entries(document) {
            // Explicit field selection instead of a map merge: source-side
            // fields take precedence on any name collision, so `ip` always
            // comes from `source`.
            records.push(FlatLogRecord {
                rule_id: entry.rule_id.clone(),
                action: entry.action.clone(),
                message: entry.message.clone(),
                ip: source.ip.clone(),
            });
        }
    }

    Ok(records)
}

/// Every audit entry in the batch, in the same order `flatten` walks them,
/// without the source join. Used by the summary job, whose query does not
/// project `source`.
pub fn audit_entries(documents: &[LogDocument]) -> Vec<&AuditEntry> {
    documents
        .iter()
        .flat_map(|document| ordered_entries(document).into_iter().map(|(_, entry)| entry))
        .collect()
}

/// Audit entries of one document sorted by numeric key.
fn ordered_entries(document: &LogDocument) -> Vec<(&str, &AuditEntry)> {
    let mut entries: Vec<(&str, &AuditEntry)> = document
        .audit_log
        .iter()
        .map(|(key, entry)| (key.as_str(), entry))
        .collect();
    entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a_num), Ok(b_num)) => a_num.cmp(&b_num),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> LogDocument {
        serde_json::from_value(value).unwrap()
    }

    fn denial_doc(ip: &str, entries: &[(&str, &str, &str, &str)]) -> LogDocument {
        let audit_log: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(key, id, action, message)| {
                (
                    (*key).to_string(),
                    json!({"id": id, "action": action, "message2": message}),
                )
            })
            .collect();
        document(json!({
            "audit_log": audit_log,
            "response": {"headers": {"http_status": "403"}},
            "source": {"ip": ip}
        }))
    }

    #[test]
    fn test_flatten_joins_entry_with_source_ip() {
        let docs = vec![denial_doc(
            "203.0.113.9",
            &[("0", "950901", "Warning", "SQLi")],
        )];
        let records = flatten(&docs).unwrap();
        assert_eq!(
            records,
            vec![FlatLogRecord {
                rule_id: "950901".to_string(),
                action: "Warning".to_string(),
                message: "SQLi".to_string(),
                ip: "203.0.113.9".to_string(),
            }]
        );
    }

    #[test]
    fn test_flatten_orders_entries_numerically_not_lexicographically() {
        let docs = vec![denial_doc(
            "203.0.113.9",
            &[
                ("10", "c", "third", "m3"),
                ("2", "b", "second", "m2"),
                ("0", "a", "first", "m1"),
            ],
        )];
        let records = flatten(&docs).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_flatten_empty_audit_log_contributes_nothing() {
        let docs = vec![document(json!({
            "audit_log": {},
            "response": {"headers": {"http_status": "200"}}
        }))];
        assert!(flatten(&docs).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_fails_on_entries_without_source() {
        let docs = vec![document(json!({
            "audit_log": {"0": {"id": "1", "action": "x", "message2": "y"}},
            "response": {"headers": {"http_status": "403"}}
        }))];
        let err = flatten(&docs).unwrap_err();
        assert!(err.to_string().contains("no source"));
    }

    #[test]
    fn test_audit_entries_walks_without_source() {
        let docs = vec![
            document(json!({
                "audit_log": {"0": {"id": "1", "action": "a", "message2": "m"}},
                "response": {"headers": {"http_status": "200"}}
            })),
            document(json!({
                "audit_log": {
                    "1": {"id": "3", "action": "c", "message2": "m"},
                    "0": {"id": "2", "action": "b", "message2": "m"}
                },
                "response": {"headers": {"http_status": "200"}}
            })),
        ];
        let ids: Vec<&str> = audit_entries(&docs)
            .iter()
            .map(|e| e.rule_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    proptest! {
        #[test]
        fn prop_flatten_record_count_matches_entry_count(
            sizes in proptest::collection::vec(0usize..8, 0..16)
        ) {
            let docs: Vec<LogDocument> = sizes
                .iter()
                .map(|&n| {
                    let entries: Vec<(String, String, String, String)> = (0..n)
                        .map(|i| (i.to_string(), format!("rule-{i}"), "act".to_string(), "msg".to_string()))
                        .collect();
                    let refs: Vec<(&str, &str, &str, &str)> = entries
                        .iter()
                        .map(|(k, id, a, m)| (k.as_str(), id.as_str(), a.as_str(), m.as_str()))
                        .collect();
                    denial_doc("192.0.2.1", &refs)
                })
                .collect();

            let records = flatten(&docs).unwrap();
            prop_assert_eq!(records.len(), sizes.iter().sum::<usize>());
        }
    }
}
