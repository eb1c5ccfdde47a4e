use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use docman::error::Error;
use docman::store::schema::CHILD_TABLES;
use docman::store::{SqliteStore, Statement, StoreAdapter};
use docman::sync::SyncEngine;
use docman::types::{EndpointDoc, OpaqueJson};

fn new_engine() -> (TempDir, SyncEngine, Arc<SqliteStore>) {
    let temp = TempDir::new().expect("create temp dir");
    let store = Arc::new(SqliteStore::new(temp.path().join("test.db")).expect("open store"));
    let engine = SyncEngine::new(store.clone());
    engine.initialize().expect("initialize schema");
    (temp, engine, store)
}

fn sample_doc(key: &str) -> EndpointDoc {
    serde_json::from_value(json!({
        "key": key,
        "name": "Create Order",
        "endpointPath": "/v2/orders",
        "status": "live",
        "description": "Creates a new order.",
        "category": "orders",
        "purpose": "Order intake",
        "rank": 10,
        "methods": ["POST"],
        "requestSchema": {"type": "object", "properties": {"amount": {"type": "number"}}},
        "responseSchema": {"type": "object", "properties": {"id": {"type": "string"}}},
        "sampleRequest": {"amount": 1250, "currency": "USD"},
        "sampleResponses": [{"id": "ord_1", "status": "created"}, {"id": "ord_2", "status": "queued"}],
        "errorResponses": [{"code": "invalid_amount"}],
        "curlExample": "curl -X POST https://api.example.com/v2/orders",
        "validationNotes": ["amount must be positive", "currency must be ISO 4217"],
        "fieldTable": [
            {"field": "amount", "type": "number", "required": true, "description": "Amount in cents"},
            {"field": "currency", "type": "string", "required": false, "description": ""}
        ],
        "products": ["payments", "billing"],
        "importantNotes": ["Idempotency keys are honored for 24h"],
        "headers": [
            {"name": "X-Api-Key", "value": "sk_live_...", "description": "Partner API key"}
        ],
        "additionalExamples": [
            {"title": "With metadata", "data": {"amount": 1, "metadata": {"po": "42"}}}
        ]
    }))
    .expect("build sample doc")
}

fn child_row_count(store: &SqliteStore, table: &str, key: &str) -> i64 {
    store
        .fetch_one(&Statement::new(
            format!("SELECT COUNT(*) FROM {table} WHERE endpoint_key = ?1"),
            vec![key.into()],
        ))
        .expect("count rows")
        .expect("count row present")
        .integer(0)
        .expect("count is integer")
}

#[test]
fn round_trip_returns_deep_equal_document() {
    let (_temp, engine, _store) = new_engine();
    let doc = sample_doc("create-order");

    engine.save_one("create-order", &doc).unwrap();
    let loaded = engine.get_one("create-order").unwrap().unwrap();

    assert_eq!(loaded, doc);
}

#[test]
fn get_one_returns_none_for_unknown_key() {
    let (_temp, engine, _store) = new_engine();
    assert!(engine.get_one("missing").unwrap().is_none());
}

#[test]
fn order_is_preserved_across_reload() {
    let (_temp, engine, _store) = new_engine();
    let doc: EndpointDoc = serde_json::from_value(json!({
        "key": "notes",
        "validationNotes": ["a", "b", "c"],
    }))
    .unwrap();

    engine.save_one("notes", &doc).unwrap();
    let loaded = engine.get_one("notes").unwrap().unwrap();

    assert_eq!(loaded.validation_notes, vec!["a", "b", "c"]);
}

#[test]
fn overwrite_is_idempotent_and_leaves_no_duplicate_rows() {
    let (_temp, engine, store) = new_engine();
    let doc = sample_doc("create-order");

    engine.save_one("create-order", &doc).unwrap();
    let first = engine.get_one("create-order").unwrap().unwrap();
    engine.save_one("create-order", &doc).unwrap();
    let second = engine.get_one("create-order").unwrap().unwrap();

    assert_eq!(first, second);

    let expected: &[(&str, i64)] = &[
        ("endpoint_request_schemas", 1),
        ("endpoint_response_schemas", 1),
        ("endpoint_sample_requests", 1),
        ("endpoint_sample_responses", 2),
        ("endpoint_error_responses", 1),
        ("endpoint_curl_examples", 1),
        ("endpoint_validation_notes", 2),
        ("endpoint_field_rows", 2),
        ("endpoint_products", 2),
        ("endpoint_important_notes", 1),
        ("endpoint_headers", 1),
        ("endpoint_additional_examples", 1),
    ];
    for (table, count) in expected {
        assert_eq!(
            child_row_count(&store, table, "create-order"),
            *count,
            "{table}"
        );
    }
}

#[test]
fn absent_collections_reload_as_empty_not_null() {
    let (_temp, engine, _store) = new_engine();
    let doc: EndpointDoc = serde_json::from_value(json!({
        "key": "bare",
        "name": "Bare endpoint",
    }))
    .unwrap();

    engine.save_one("bare", &doc).unwrap();
    let loaded = engine.get_one("bare").unwrap().unwrap();

    assert_eq!(loaded.headers, Vec::new());
    assert_eq!(loaded.validation_notes, Vec::<String>::new());
    assert_eq!(loaded.request_schema, OpaqueJson(json!({})));
    assert_eq!(loaded.sample_request, OpaqueJson(json!({})));
    assert_eq!(loaded.curl_example, "");
}

#[test]
fn delete_cascades_to_every_child_table() {
    let (_temp, engine, store) = new_engine();
    let doc = sample_doc("doomed");

    engine.save_one("doomed", &doc).unwrap();
    assert!(engine.delete_one("doomed").unwrap());

    assert!(engine.get_one("doomed").unwrap().is_none());
    for table in CHILD_TABLES {
        assert_eq!(child_row_count(&store, table.name, "doomed"), 0, "{}", table.name);
    }

    assert!(!engine.delete_one("doomed").unwrap());
}

#[test]
fn bulk_import_reports_partial_failure_and_keeps_going() {
    let (_temp, engine, _store) = new_engine();

    let mut docs = BTreeMap::new();
    docs.insert("alpha".to_string(), sample_doc("alpha"));
    docs.insert("bad key!".to_string(), sample_doc("bad key!"));
    docs.insert("zulu".to_string(), sample_doc("zulu"));

    let report = engine.import_all(&docs);

    assert_eq!(report.succeeded, vec!["alpha", "zulu"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].key, "bad key!");
    assert!(!report.failed[0].error.is_empty());

    assert!(engine.get_one("alpha").unwrap().is_some());
    assert!(engine.get_one("zulu").unwrap().is_some());
    assert!(engine.get_one("bad key!").unwrap().is_none());
}

#[test]
fn summary_list_orders_by_rank_then_creation() {
    let (_temp, engine, _store) = new_engine();

    let mut rank5 = sample_doc("rank5");
    rank5.rank = 5;
    let mut first_rank1 = sample_doc("first-rank1");
    first_rank1.rank = 1;
    let mut second_rank1 = sample_doc("second-rank1");
    second_rank1.rank = 1;
    let mut rank999 = sample_doc("rank999");
    rank999.rank = 999;

    engine.save_one("rank5", &rank5).unwrap();
    engine.save_one("first-rank1", &first_rank1).unwrap();
    engine.save_one("second-rank1", &second_rank1).unwrap();
    engine.save_one("rank999", &rank999).unwrap();

    let summaries = engine.get_summary_list().unwrap();
    let keys: Vec<&str> = summaries.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["first-rank1", "second-rank1", "rank5", "rank999"]);

    assert_eq!(summaries[0].products, vec!["payments", "billing"]);
    assert_eq!(summaries[0].methods, vec!["POST"]);
}

#[test]
fn export_all_materializes_every_document() {
    let (_temp, engine, _store) = new_engine();

    engine.save_one("alpha", &sample_doc("alpha")).unwrap();
    engine.save_one("zulu", &sample_doc("zulu")).unwrap();

    let docs = engine.export_all().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs["alpha"], sample_doc("alpha"));
    assert_eq!(docs["zulu"], sample_doc("zulu"));
}

#[test]
fn import_then_export_round_trips_the_corpus() {
    let (_temp, engine, _store) = new_engine();

    let mut docs = BTreeMap::new();
    docs.insert("alpha".to_string(), sample_doc("alpha"));
    docs.insert("zulu".to_string(), sample_doc("zulu"));

    let report = engine.import_all(&docs);
    assert!(report.failed.is_empty());

    assert_eq!(engine.export_all().unwrap(), docs);
}

#[test]
fn corrupted_stored_payload_surfaces_as_malformed_not_missing() {
    let (_temp, engine, store) = new_engine();

    engine.save_one("create-order", &sample_doc("create-order")).unwrap();
    store
        .execute(&Statement::new(
            "UPDATE endpoint_request_schemas SET body = ?1 WHERE endpoint_key = ?2",
            vec!["{broken".into(), "create-order".into()],
        ))
        .unwrap();

    let result = engine.get_one("create-order");
    assert!(matches!(result, Err(Error::MalformedPayload(_))));
}

#[test]
fn export_aborts_on_malformed_payload() {
    let (_temp, engine, store) = new_engine();

    engine.save_one("good", &sample_doc("good")).unwrap();
    engine.save_one("broken", &sample_doc("broken")).unwrap();
    store
        .execute(&Statement::new(
            "UPDATE endpoint_sample_responses SET body = ?1 WHERE endpoint_key = ?2",
            vec!["not json".into(), "broken".into()],
        ))
        .unwrap();

    let result = engine.export_all();
    assert!(matches!(result, Err(Error::MalformedPayload(_))));
}

#[test]
fn bare_string_methods_and_bare_object_responses_normalize_on_save() {
    let (_temp, engine, _store) = new_engine();
    let doc: EndpointDoc = serde_json::from_value(json!({
        "key": "legacy",
        "methods": "GET",
        "sampleResponses": {"status": "ok"},
    }))
    .unwrap();

    engine.save_one("legacy", &doc).unwrap();
    let loaded = engine.get_one("legacy").unwrap().unwrap();

    assert_eq!(loaded.methods, vec!["GET"]);
    assert_eq!(loaded.sample_responses, vec![OpaqueJson(json!({"status": "ok"}))]);
}
