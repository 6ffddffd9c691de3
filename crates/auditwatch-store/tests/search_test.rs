// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use auditwatch_store::{LogStore, LogStoreConfig, SearchQuery};

fn store_for(server: &Server) -> LogStore {
    LogStore::new(LogStoreConfig {
        url: server.url(),
        username: "batch".to_string(),
        password: "secret".to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("failed to build store")
}

#[tokio::test]
async fn search_decodes_document_batch() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/nginx-*/_search")
        .match_query(Matcher::UrlEncoded("size".into(), "10000".into()))
        .match_header("authorization", Matcher::Regex("Basic .+".to_string()))
        .match_body(Matcher::PartialJson(json!({
            "query": {"range": {"@timestamp": {"gte": "now-20m", "lt": "now"}}}
        })))
        .with_status(200)
        .with_body(
            json!({
                "hits": {
                    "hits": [{
                        "_source": {
                            "date": "2024-05-01",
                            "audit_log": {
                                "0": {"id": "950901", "action": "Access denied", "message2": "blocked"}
                            },
                            "response": {"headers": {"http_status": "403"}},
                            "source": {"ip": "198.51.100.7"},
                            "geoip": {}
                        }
                    }],
                    "total": {"value": 1}
                },
                "_shards": {"total": 3, "successful": 3, "skipped": 0, "failed": 0}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = store_for(&server);
    let query = SearchQuery::new(["date", "audit_log", "response", "source", "geoip"])
        .with_timestamp_range("now-20m", "now");

    let response = store.search("nginx-*", &query).await.expect("search failed");
    assert_eq!(response.hits.total.value, 1);
    let document = response.documents().next().expect("no documents");
    assert_eq!(document.audit_log["0"].action, "Access denied");
    assert!(document.geoip.is_none());

    mock.assert_async().await;
}

#[tokio::test]
async fn search_surfaces_store_rejection() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/nginx-2024-05-01/_search")
        .match_query(Matcher::UrlEncoded("size".into(), "10000".into()))
        .with_status(400)
        .with_body("parsing_exception")
        .create_async()
        .await;

    let store = store_for(&server);
    let query = SearchQuery::new(["date", "audit_log", "response"]);

    let err = store
        .search("nginx-2024-05-01", &query)
        .await
        .expect_err("expected rejection");
    let message = err.to_string();
    assert!(message.contains("400"), "unexpected error: {message}");
    assert!(message.contains("parsing_exception"));

    mock.assert_async().await;
}

#[tokio::test]
async fn search_flags_contract_violations_as_decode_errors() {
    let mut server = Server::new_async().await;

    // http_status missing from the response headers.
    let mock = server
        .mock("POST", "/nginx-*/_search")
        .match_query(Matcher::UrlEncoded("size".into(), "10000".into()))
        .with_status(200)
        .with_body(
            json!({
                "hits": {
                    "hits": [{"_source": {"audit_log": {}, "response": {"headers": {}}}}],
                    "total": {"value": 1}
                },
                "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = store_for(&server);
    let query = SearchQuery::new(["date", "audit_log", "response"]);

    let err = store
        .search("nginx-*", &query)
        .await
        .expect_err("expected decode failure");
    assert!(matches!(err, auditwatch_store::StoreError::Decode(_)));

    mock.assert_async().await;
}
