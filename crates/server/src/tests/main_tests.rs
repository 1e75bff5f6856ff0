use super::*;
use axum::{body, body::Body, http::Request};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    build_router(
        Arc::new(AppState {
            api: ApiContext::new(),
        }),
        64 * 1024,
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn seed(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/accounts",
            json!({
                "accountNumber": "INT123456",
                "accountHolderName": "Integration Test User",
                "balance": 1500.00
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("assigned id")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn lists_created_accounts() {
    let app = test_app();
    seed(&app).await;

    let (status, body) = send(&app, empty_request("GET", "/api/accounts")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
    assert_eq!(body[0]["accountNumber"], "INT123456");
    assert_eq!(body[0]["accountHolderName"], "Integration Test User");
}

#[tokio::test]
async fn create_returns_created_record() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/accounts",
            json!({
                "accountNumber": "INT789012",
                "accountHolderName": "New Integration User",
                "balance": 2000.00
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["accountNumber"], "INT789012");
    assert_eq!(body["accountHolderName"], "New Integration User");
    assert_eq!(body["balance"], 2000.0);
}

#[tokio::test]
async fn update_replaces_record() {
    let app = test_app();
    let id = seed(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/accounts/{id}"),
            json!({
                "id": id,
                "accountNumber": "INT123456",
                "accountHolderName": "Updated Integration User",
                "balance": 2500.00
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accountHolderName"], "Updated Integration User");
    assert_eq!(body["balance"], 2500.0);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = test_app();
    let id = seed(&app).await;

    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/accounts/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, empty_request("GET", &format!("/api/accounts/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], format!("Account not found with id: {id}"));
}

#[tokio::test]
async fn validation_failures_return_bad_request_with_message() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/accounts",
            json!({
                "accountNumber": "1234567890",
                "accountHolderName": "John Doe",
                "balance": -5
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
    assert_eq!(body["message"], "Balance must be a non-negative number");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = build_router(
        Arc::new(AppState {
            api: ApiContext::new(),
        }),
        32,
    );
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/accounts",
            json!({
                "accountNumber": "1234567890",
                "accountHolderName": "A name long enough to pass the limit",
                "balance": 1
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
