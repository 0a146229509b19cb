//! End-to-end handler coverage: event decoding, status mapping, wire shapes

mod common;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use quickstats::{BlobStore, EngineConfig, Event, Handler, MemoryBlobStore, Response, StatsEngine};
use quickstats_store::testing::FlakyStore;
use serde_json::{json, Value};

fn handler() -> (Arc<MemoryBlobStore>, Handler) {
    common::init_tracing();
    let store = Arc::new(MemoryBlobStore::new());
    let engine = StatsEngine::new(store.clone(), EngineConfig::new("quick-stats"));
    (store, Handler::new(engine))
}

fn body_json(response: &Response) -> Value {
    serde_json::from_str(&response.body).unwrap()
}

fn event(payload: Value) -> Event {
    Event::with_body(payload.to_string())
}

#[test]
fn test_missing_body_is_400() {
    let (_, handler) = handler();
    let response = handler.handle(&Event::default(), None);
    assert_eq!(response.status, 400);
    assert_eq!(
        body_json(&response),
        json!({"ok": false, "error": "Missing body"})
    );
}

#[test]
fn test_malformed_json_is_400() {
    let (_, handler) = handler();
    let response = handler.handle(&Event::with_body("{\"appName\": "), None);
    assert_eq!(response.status, 400);
    assert_eq!(body_json(&response)["error"], "Body is not valid JSON");
}

#[test]
fn test_base64_body_roundtrip() {
    let (store, handler) = handler();
    let payload = json!({"appName": "app", "ops": [{"op": "set", "path": "k", "value": 7}]});
    let response = handler.handle(&Event::with_base64_body(BASE64.encode(payload.to_string())), None);
    assert_eq!(response.status, 200);
    let (doc, _) = store.read("app/stats.json").unwrap().unwrap();
    assert_eq!(doc, json!({"k": 7}));
}

#[test]
fn test_missing_app_name_is_400() {
    let (_, handler) = handler();
    let response = handler.handle(&event(json!({"ops": []})), None);
    assert_eq!(response.status, 400);
    assert_eq!(body_json(&response)["error"], "Missing or invalid appName");
}

#[test]
fn test_non_array_ops_is_400() {
    let (_, handler) = handler();
    let response = handler.handle(
        &event(json!({"appName": "app", "ops": {"op": "inc", "path": "n"}})),
        None,
    );
    assert_eq!(response.status, 400);
    assert_eq!(body_json(&response)["error"], "ops must be a list");
}

#[test]
fn test_empty_ops_fetches_document() {
    let (store, handler) = handler();
    store.write("app/stats.json", &json!({"n": 3})).unwrap();
    let response = handler.handle(&event(json!({"appName": "app"})), None);
    assert_eq!(response.status, 200);
    let body = body_json(&response);
    assert_eq!(body["stats"], json!({"n": 3}));
    assert_eq!(body["bucket"], json!("quick-stats"));
    assert_eq!(body["key"], json!("app/stats.json"));
}

#[test]
fn test_unknown_op_is_400() {
    let (_, handler) = handler();
    let response = handler.handle(
        &event(json!({"appName": "app", "ops": [{"op": "increment", "path": "n"}]})),
        None,
    );
    assert_eq!(response.status, 400);
    assert!(body_json(&response)["error"]
        .as_str()
        .unwrap()
        .contains("Unknown op"));
}

#[test]
fn test_non_numeric_inc_by_is_400() {
    let (_, handler) = handler();
    let response = handler.handle(
        &event(json!({"appName": "app", "ops": [{"op": "inc", "path": "n", "by": "x"}]})),
        None,
    );
    assert_eq!(response.status, 400);
    assert_eq!(body_json(&response)["error"], "inc 'by' must be a number");
}

#[test]
fn test_missing_document_is_404_when_creation_disallowed() {
    let (_, handler) = handler();
    let response = handler.handle(
        &event(json!({"appName": "app", "createIfMissing": false})),
        None,
    );
    assert_eq!(response.status, 404);
    assert_eq!(body_json(&response)["error"], "Stats file not found");
}

#[test]
fn test_stale_etag_is_409() {
    let (store, handler) = handler();
    store.write("app/stats.json", &json!({"n": 1})).unwrap();
    let response = handler.handle(
        &event(json!({
            "appName": "app",
            "ops": [{"op": "inc", "path": "n"}],
            "ifMatchEtag": "\"deadbeef\""
        })),
        None,
    );
    assert_eq!(response.status, 409);
    // Nothing was written.
    let (doc, _) = store.read("app/stats.json").unwrap().unwrap();
    assert_eq!(doc, json!({"n": 1}));
}

#[test]
fn test_matching_etag_passes_and_reports_new_etag() {
    let (store, handler) = handler();
    store.write("app/stats.json", &json!({"n": 1})).unwrap();
    let etag = store.etag_of("app/stats.json").unwrap();
    let response = handler.handle(
        &event(json!({
            "appName": "app",
            "ops": [{"op": "inc", "path": "n"}],
            "ifMatchEtag": etag
        })),
        None,
    );
    assert_eq!(response.status, 200);
    let body = body_json(&response);
    assert_eq!(body["stats"], json!({"n": 2}));
    assert_ne!(body["etag"], json!(etag));
}

#[test]
fn test_storage_failure_is_generic_500() {
    common::init_tracing();
    let store = Arc::new(FlakyStore::new(MemoryBlobStore::new()));
    store.fail_reads(true);
    let handler = Handler::new(StatsEngine::new(
        store,
        EngineConfig::new("quick-stats"),
    ));
    let response = handler.handle(&event(json!({"appName": "app"})), Some("req-42"));
    assert_eq!(response.status, 500);
    assert_eq!(
        body_json(&response),
        json!({"ok": false, "error": "Internal error"})
    );
}

#[test]
fn test_version_id_present_after_write() {
    let (_, handler) = handler();
    let response = handler.handle(
        &event(json!({"appName": "app", "ops": [{"op": "inc", "path": "n"}]})),
        None,
    );
    let body = body_json(&response);
    assert_eq!(body["versionId"], json!("v1"));
}

#[test]
fn test_version_id_omitted_on_dry_run() {
    let (_, handler) = handler();
    let response = handler.handle(
        &event(json!({
            "appName": "app",
            "ops": [{"op": "inc", "path": "n"}],
            "dryRun": true
        })),
        None,
    );
    assert_eq!(response.status, 200);
    let body = body_json(&response);
    assert_eq!(body["dryRun"], json!(true));
    assert!(body.get("versionId").is_none());
    // Dry run against a fresh document has no ETag to report.
    assert_eq!(body["etag"], Value::Null);
}

#[test]
fn test_batch_failure_surfaces_first_error() {
    let (store, handler) = handler();
    let response = handler.handle(
        &event(json!({
            "appName": "app",
            "ops": [
                {"op": "set", "path": "a", "value": 1},
                {"op": "set", "path": "b"},
                {"op": "set", "path": "c", "value": 3}
            ]
        })),
        None,
    );
    assert_eq!(response.status, 400);
    assert!(body_json(&response)["error"]
        .as_str()
        .unwrap()
        .contains("requires 'value'"));
    // The aborted batch persisted nothing.
    assert!(store.read("app/stats.json").unwrap().is_none());
}
