use serde_json::json;

use super::*;

// ==================== RequestEnvelope Tests ====================

#[test]
fn test_single_envelope_wire_shape() {
    let envelope = RequestEnvelope::Single(QueryRequest::new("query { findManyUser { id } }"));

    let value = serde_json::to_value(&envelope).unwrap();

    assert_eq!(
        value,
        json!({ "query": "query { findManyUser { id } }", "variables": {} })
    );
    assert!(!envelope.is_batch());
}

#[test]
fn test_single_envelope_keeps_variables() {
    let mut variables = serde_json::Map::new();
    variables.insert("take".into(), json!(10));
    let envelope = RequestEnvelope::Single(QueryRequest::new("q").with_variables(variables));

    let value = serde_json::to_value(&envelope).unwrap();

    assert_eq!(value["variables"]["take"], 10);
}

#[test]
fn test_batch_envelope_wire_shape() {
    let envelope = RequestEnvelope::Batch(BatchRequest::new(
        vec!["q1".into(), "q2".into()],
        true,
    ));

    let value = serde_json::to_value(&envelope).unwrap();

    assert_eq!(
        value,
        json!({
            "batch": [
                { "query": "q1", "variables": {} },
                { "query": "q2", "variables": {} }
            ],
            "transaction": true
        })
    );
    assert!(envelope.is_batch());
}

#[test]
fn test_query_request_variables_default_when_absent() {
    let request: QueryRequest = serde_json::from_value(json!({ "query": "q" })).unwrap();
    assert!(request.variables.is_empty());
}

// ==================== Event description Tests ====================

#[test]
fn test_batch_description() {
    let batch = BatchRequest::new(vec!["q1".into(), "q2".into(), "q3".into()], true);
    assert_eq!(batch.describe(), "Batch in transaction (3):\nq1\nq2\nq3");

    let batch = BatchRequest::new(vec!["q1".into()], false);
    assert_eq!(batch.describe(), "Batch (1):\nq1");
}

#[test]
fn test_single_description_is_query_text() {
    let envelope = RequestEnvelope::Single("query { a }".into());
    assert_eq!(envelope.describe(), "query { a }");
}

// ==================== BatchResponse Tests ====================

#[test]
fn test_batch_response_preserves_order() {
    let response: BatchResponse = serde_json::from_value(json!({
        "batchResult": [{ "data": 1 }, { "data": 2 }, { "data": 3 }]
    }))
    .unwrap();

    let data: Vec<i64> = response
        .batch_result
        .iter()
        .map(|r| r["data"].as_i64().unwrap())
        .collect();
    assert_eq!(data, vec![1, 2, 3]);
}

#[test]
fn test_batch_response_requires_batch_result() {
    let result = serde_json::from_value::<BatchResponse>(json!({ "data": {} }));
    assert!(result.is_err());
}

// ==================== Transaction Tests ====================

#[test]
fn test_transaction_options_default() {
    let opts = TransactionOptions::default();
    assert_eq!(opts.max_wait, 2000);
    assert_eq!(opts.timeout, 5000);
    assert!(opts.isolation_level.is_none());
}

#[test]
fn test_transaction_action_gerund() {
    assert_eq!(TransactionAction::Start.gerund(), "starting");
    assert_eq!(TransactionAction::Rollback.gerund(), "rolling back");
}
