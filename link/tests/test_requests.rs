//! Wire shape of requests sent to the proxy: URLs, headers, bodies.

mod common;

use common::{client_with, EventLog, Reply, ScriptedTransport, CLIENT_VERSION};
use dataproxy_link::{
    DataProxyClient, DataProxyError, EventKind, Headers, HttpMethod, LogLevel, QueryRequest,
    SchemaVersion, TransactionAction, TransactionOptions,
};
use serde_json::{json, Value};

#[tokio::test(start_paused = true)]
async fn test_batch_in_transaction_returns_results_in_order() {
    let transport = ScriptedTransport::new(
        vec![Reply::ok(
            r#"{"batchResult":[{"data":{"n":1}},{"data":{"n":2}},{"data":{"n":3}}]}"#,
        )],
        Reply::Status(500, String::new()),
    );
    let log = EventLog::default();
    let client = client_with(transport.clone(), &log);

    let results = client
        .request_batch(
            vec![
                QueryRequest::new("query { one }"),
                QueryRequest::new("query { two }"),
                QueryRequest::new("query { three }"),
            ],
            true,
            Headers::new(),
        )
        .await
        .unwrap();

    let numbers: Vec<i64> = results.iter().map(|r| r["data"]["n"].as_i64().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let sent: Value = serde_json::from_str(&transport.requests()[0].body).unwrap();
    assert_eq!(sent["transaction"], true);
    let queries: Vec<&str> = sent["batch"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["query"].as_str().unwrap())
        .collect();
    assert_eq!(queries, vec!["query { one }", "query { two }", "query { three }"]);

    assert_eq!(
        log.messages(EventKind::Query),
        vec!["Batch in transaction (3):\nquery { one }\nquery { two }\nquery { three }"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_batch_without_batch_result_is_an_error() {
    let transport = ScriptedTransport::new(vec![Reply::ok(r#"{"data":{}}"#)], Reply::ok("{}"));
    let client = client_with(transport.clone(), &EventLog::default());

    let err = client
        .request_batch(vec!["query { a }".into()], false, Headers::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DataProxyError::Serialization(_)));
    assert_eq!(transport.count(HttpMethod::Post), 1);
}

#[tokio::test]
async fn test_single_request_url_headers_and_body() {
    let transport = ScriptedTransport::new(vec![Reply::ok(r#"{"data":{}}"#)], Reply::ok("{}"));
    let client = client_with(transport.clone(), &EventLog::default());

    let mut headers = Headers::new();
    headers.insert("authorization".into(), "Bearer caller-token".into());
    headers.insert("traceparent".into(), "00-trace-span-01".into());
    client.request("query { findManyUser { id } }", headers).await.unwrap();

    let request = &transport.requests()[0];
    let hash = SchemaVersion::new(common::SCHEMA).schema_hash;
    assert_eq!(
        request.url,
        format!("https://proxy.example/{}/{}/graphql", CLIENT_VERSION, hash)
    );
    assert_eq!(
        request.headers.get("Authorization").map(String::as_str),
        Some("Bearer TEST_KEY")
    );
    assert!(!request.headers.contains_key("authorization"));
    assert_eq!(
        request.headers.get("traceparent").map(String::as_str),
        Some("00-trace-span-01")
    );
    assert_eq!(
        request.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, json!({ "query": "query { findManyUser { id } }", "variables": {} }));
}

#[tokio::test]
async fn test_interactive_transaction_is_rejected_without_network() {
    let transport = ScriptedTransport::new(vec![], Reply::ok("{}"));
    let client = client_with(transport.clone(), &EventLog::default());

    let start = client.transaction(TransactionAction::Start, Some(&TransactionOptions::default()));
    let commit = client.transaction(TransactionAction::Commit, None);

    assert!(matches!(start, Err(DataProxyError::UnsupportedOperation(_))));
    assert!(matches!(commit, Err(DataProxyError::UnsupportedOperation(_))));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_lifecycle_hooks_are_noops() {
    let transport = ScriptedTransport::new(vec![], Reply::ok("{}"));
    let client = client_with(transport.clone(), &EventLog::default());

    client.start().await.unwrap();
    client.stop().await.unwrap();

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_listener_added_after_construction_receives_events() {
    let transport = ScriptedTransport::new(vec![Reply::ok("{}")], Reply::ok("{}"));
    let client = client_with(transport, &EventLog::default());
    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&seen);

    client
        .on(dataproxy_link::EngineEventType::Query, move |e| {
            sink.lock().unwrap().push(e.message().to_string())
        })
        .unwrap();
    client.request("query { late }", Headers::new()).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["query { late }"]);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_caller_header_fails_without_retrying() {
    let transport = ScriptedTransport::new(vec![], Reply::ok("{}"));
    let log = EventLog::default();
    let client = client_with(transport.clone(), &log);

    let mut headers = Headers::new();
    headers.insert("bad header".into(), "x".into());
    let err = client.request("query { a }", headers).await.unwrap_err();

    assert!(matches!(err, DataProxyError::Configuration(_)));
    assert!(!err.is_retryable());
    assert!(transport.requests().is_empty());
    assert!(log.of(EventKind::Warn).is_empty());
    assert!(log.of(EventKind::Error).is_empty());
}

#[tokio::test]
async fn test_captured_query_logs_are_emitted_as_query_events() {
    let body = r#"{
        "data": { "findManyUser": [] },
        "extensions": { "logs": [
            { "span_id": "1", "name": "quaint:query", "level": "query", "timestamp": [1700000000, 5],
              "attributes": { "query": "SELECT \"id\" FROM \"User\" /* traceparent=00-123-0-01 */",
                              "duration_ms": 4, "params": "[]", "target": "quaint::connector::metrics" } },
            { "span_id": "2", "name": "engine", "level": "info", "timestamp": [1700000000, 6],
              "attributes": { "message": "Started" } }
        ] }
    }"#;
    let transport = ScriptedTransport::new(vec![Reply::ok(body)], Reply::ok("{}"));
    let log = EventLog::default();
    let client = DataProxyClient::builder()
        .schema_text(common::SCHEMA)
        .client_version(CLIENT_VERSION)
        .log_level(LogLevel::Info)
        .log_queries(true)
        .event_handlers(log.handlers())
        .transport(transport.clone())
        .build()
        .unwrap();

    let response = client
        .request("query { findManyUser { id } }", Headers::new())
        .await
        .unwrap();

    assert_eq!(response, serde_json::from_str::<Value>(body).unwrap());
    assert_eq!(
        transport.requests()[0]
            .headers
            .get("X-capture-telemetry")
            .map(String::as_str),
        Some("info, query")
    );

    let queries = log.of(EventKind::Query);
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].message(), "query { findManyUser { id } }");
    assert_eq!(queries[1].payload["query"], "SELECT \"id\" FROM \"User\" ");
    assert_eq!(queries[1].payload["duration"], 4);
    assert_eq!(queries[1].payload["params"], "[]");
    assert_eq!(queries[1].payload["target"], "quaint::connector::metrics");
    assert_eq!(queries[1].payload["timestamp"], json!([1700000000, 5]));
}

#[tokio::test]
async fn test_no_capture_header_by_default() {
    let transport = ScriptedTransport::new(vec![Reply::ok(r#"{"data":{}}"#)], Reply::ok("{}"));
    let client = client_with(transport.clone(), &EventLog::default());

    client.request("query { a }", Headers::new()).await.unwrap();

    assert!(!transport.requests()[0]
        .headers
        .contains_key("X-capture-telemetry"));
}
