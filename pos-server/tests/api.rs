//! HTTP surface tests
//!
//! Exercises validation and discovery behavior through the real router.
//! Successful dispatch needs hardware and is covered by unit tests on
//! the dispatcher with stub transports instead.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pos_server::{api, AppState, Config};

fn test_router() -> axum::Router {
    let mut config = Config::from_env();
    config.printer_host = None;
    config.printer_name = None;
    api::router(AppState::new(config))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn print_receipt_rejects_empty_items() {
    let response = test_router()
        .oneshot(post_json("/print/receipt", json!({"items": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("item"));
}

#[tokio::test]
async fn print_receipt_rejects_missing_items() {
    let response = test_router()
        .oneshot(post_json("/print/receipt", json!({"cartTotal": 150.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn print_receipt_rejects_non_list_items() {
    let response = test_router()
        .oneshot(post_json("/print/receipt", json!({"items": "Rice 1kg"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn receipt_pdf_rejects_empty_items() {
    // Validation fires before the browser is ever launched
    let response = test_router()
        .oneshot(post_json("/receipt", json!({"items": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_printers_always_succeeds() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/print/printers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let printers = body["printers"].as_array().unwrap();
    assert!(!printers.is_empty());
    assert!(!body["defaultPrinter"].as_str().unwrap().is_empty());

    // Every record carries the full shape
    for printer in printers {
        assert!(printer["name"].is_string());
        assert!(printer["status"].is_string());
        assert!(printer["isDefault"].is_boolean());
    }
}
