mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use phishing_detector::server::router;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(common::sample_context()))
}

fn predict_request(body: &str) -> Request<Body> {
    Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: parse a JSON response body into a `serde_json::Value`.
async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_predict_returns_label() {
    let resp = app()
        .oneshot(predict_request(r#"{"email": "Free money now, click here!!!"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let result = body["result"].as_str().unwrap();
    assert!(result == "Phishing" || result == "Legitimate");
}

#[tokio::test]
async fn test_predict_separates_obvious_examples() {
    let resp = app()
        .oneshot(predict_request(
            r#"{"email": "Verify your bank account password immediately, it has been suspended"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await["result"], "Phishing");

    let resp = app()
        .oneshot(predict_request(
            r#"{"email": "Agenda for the project meeting, the schedule works for the team"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await["result"], "Legitimate");
}

#[tokio::test]
async fn test_missing_email_is_rejected() {
    let resp = app().oneshot(predict_request("{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await,
        serde_json::json!({"error": "No email content provided"})
    );
}

#[tokio::test]
async fn test_empty_or_null_email_is_rejected() {
    for body in [
        r#"{"email": ""}"#,
        r#"{"email": null}"#,
        r#"{"email": false}"#,
        r#"{"email": 0}"#,
        r#"{"email": []}"#,
        r#"{"email": {}}"#,
    ] {
        let resp = app().oneshot(predict_request(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(json_body(resp).await["error"], "No email content provided");
    }
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    for body in ["not json", r#"{"email": 42}"#, r#"{"email": true}"#] {
        let resp = app().oneshot(predict_request(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");

        let error = json_body(resp).await["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Invalid JSON payload"), "error: {error}");
    }
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let req = Request::post("/predict")
        .body(Body::from(r#"{"email": "hello"}"#))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let req = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "chrome-extension://abcdef")
        .body(Body::from(r#"{"email": "Lunch on Thursday?"}"#))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
