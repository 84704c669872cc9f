mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn add_returns_the_created_line() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/cart/session-a",
            Some(json!({ "productId": 3, "quantity": 2 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["productId"], 3);
    assert_eq!(body["quantity"], 2);
    assert_eq!(body["sessionId"], "session-a");
    assert!(body["id"].as_i64().is_some());
}

#[tokio::test]
async fn repeated_adds_create_duplicate_lines() {
    let app = TestApp::new().await;

    let first = app.add_line("dup", 1, 1).await;
    let second = app.add_line("dup", 1, 1).await;
    assert_ne!(first, second);

    let lines = response_json(app.request(Method::GET, "/api/cart/dup", None).await).await;
    let lines = lines.as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l["productId"] == 1));
}

#[tokio::test]
async fn sessions_are_isolated() {
    let app = TestApp::new().await;

    app.add_line("alice", 1, 1).await;
    app.add_line("bob", 2, 5).await;

    let alice = response_json(app.request(Method::GET, "/api/cart/alice", None).await).await;
    assert_eq!(alice.as_array().unwrap().len(), 1);
    assert_eq!(alice[0]["productId"], 1);

    let nobody = response_json(app.request(Method::GET, "/api/cart/carol", None).await).await;
    assert!(nobody.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn session_ids_with_reserved_characters_are_ordinary_keys() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/cart/has%20space%2Fslash",
            Some(json!({ "productId": 1, "quantity": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["sessionId"], "has space/slash");

    let response = app
        .request(Method::GET, "/api/cart/has%20space%2Fslash", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let lines = response_json(response).await;
    assert_eq!(lines.as_array().unwrap().len(), 1);

    let order = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "email": "a@b.co",
                "address": "12 Long Street",
                "sessionId": "has space/slash",
                "total": "15.99",
            })),
        )
        .await;
    assert_eq!(order.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_to_zero_keeps_the_line() {
    let app = TestApp::new().await;
    let item_id = app.add_line("zero", 2, 3).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/cart/{item_id}"),
            Some(json!({ "quantity": 0 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["quantity"], 0);

    let lines = response_json(app.request(Method::GET, "/api/cart/zero", None).await).await;
    assert_eq!(lines.as_array().unwrap().len(), 1);
    assert_eq!(lines[0]["quantity"], 0);
}

#[tokio::test]
async fn update_missing_line_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::PUT, "/api/cart/4242", Some(json!({ "quantity": 1 })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_non_integer_id_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::PUT, "/api/cart/abc", Some(json!({ "quantity": 1 })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remove_is_idempotent() {
    let app = TestApp::new().await;
    let item_id = app.add_line("rm", 4, 1).await;

    for _ in 0..2 {
        let response = app
            .request(Method::DELETE, &format!("/api/cart/{item_id}"), None)
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let lines = response_json(app.request(Method::GET, "/api/cart/rm", None).await).await;
    assert!(lines.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/cart/neg",
            Some(json!({ "productId": 1, "quantity": -1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let item_id = app.add_line("neg", 1, 1).await;
    let response = app
        .request(
            Method::PUT,
            &format!("/api/cart/{item_id}"),
            Some(json!({ "quantity": -5 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_raw(Method::POST, "/api/cart/bad", "{\"productId\": \"one\"")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::POST, "/api/cart/bad", Some(json!({ "quantity": 1 })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_product_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/cart/ghost",
            Some(json!({ "productId": 999, "quantity": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
