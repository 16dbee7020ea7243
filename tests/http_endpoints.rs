//! HTTP transport tests using Actix Web's test service.

mod common;

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use common::{StubBackend, dispatcher_with};
use retrieval_mcp_server::core::server::configure;

macro_rules! service {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(dispatcher_with(Arc::new(StubBackend::default()))))
                .configure(configure),
        )
        .await
    };
}

#[actix_rt::test]
async fn health_reports_service_name() {
    let app = service!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "ok", "service": "retrieval-test" }));
}

#[actix_rt::test]
async fn mcp_endpoint_dispatches_requests() {
    let app = service!();
    for path in ["/mcp", "/"] {
        let req = test::TestRequest::post()
            .uri(path)
            .set_json(json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 3);
    }
}

#[actix_rt::test]
async fn tool_calls_return_text_content() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/mcp")
        .set_json(json!({
            "jsonrpc": "2.0",
            "id": "call-1",
            "method": "tools/call",
            "params": { "name": "search", "arguments": { "query": "rust" } }
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], "call-1");
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["search_query"], "rust");
}

#[actix_rt::test]
async fn invalid_json_gets_a_json_rpc_parse_error() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/mcp")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], -32700);
    assert!(body.get("result").is_none());
}

#[actix_rt::test]
async fn notifications_are_accepted_without_body() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/mcp")
        .set_json(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());
}

#[actix_rt::test]
async fn unknown_methods_are_errors_with_ok_status() {
    let app = service!();
    let req = test::TestRequest::post()
        .uri("/mcp")
        .set_json(json!({ "jsonrpc": "2.0", "id": null, "method": "foo/bar" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], Value::Null);
    assert!(body.as_object().unwrap().contains_key("id"));
    assert_eq!(body["error"]["code"], -32601);
}
