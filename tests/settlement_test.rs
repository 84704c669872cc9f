//! Orders settled from the session cart (`checkout.settle_from_cart = true`).

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde_json::{json, Value};
use storefront_api::entities::{order_item, Order, OrderItem, Product};

async fn settling_app() -> TestApp {
    TestApp::with_config(|cfg| cfg.checkout.settle_from_cart = true).await
}

fn checkout_form(session_id: &str) -> Value {
    json!({
        "email": "a@b.co",
        "address": "12 Long Street, Springfield",
        "sessionId": session_id,
        "total": "35.97",
    })
}

async fn assert_nothing_was_settled(app: &TestApp, session_id: &str, lines: usize) {
    assert_eq!(Order::find().count(&*app.state.db).await.unwrap(), 0);
    assert_eq!(OrderItem::find().count(&*app.state.db).await.unwrap(), 0);

    let uri = format!("/api/cart/{}", session_id);
    let cart = response_json(app.request(Method::GET, &uri, None).await).await;
    assert_eq!(cart.as_array().unwrap().len(), lines);
}

#[tokio::test]
async fn total_is_recomputed_and_cart_is_cleared() {
    let app = settling_app().await;
    app.add_line("S", 1, 2).await;
    app.add_line("S", 4, 1).await;
    app.add_line("S", 3, 0).await;
    app.add_line("other", 5, 1).await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "email": "a@b.co",
                "address": "12 Long Street, Springfield",
                "sessionId": "S",
                "total": "1.00",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let order = response_json(response).await;
    assert_eq!(order["total"], "35.97");
    let order_id = order["id"].as_i64().unwrap() as i32;

    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(&*app.state.db)
        .await
        .unwrap();
    let snapshot: Vec<(i32, i32, &str)> = items
        .iter()
        .map(|i| (i.product_id, i.quantity, i.unit_price.as_str()))
        .collect();
    assert_eq!(snapshot, vec![(1, 2, "15.99"), (4, 1, "3.99")]);

    let cart = response_json(app.request(Method::GET, "/api/cart/S", None).await).await;
    assert!(cart.as_array().unwrap().is_empty());

    // Other sessions are untouched.
    let other = response_json(app.request(Method::GET, "/api/cart/other", None).await).await;
    assert_eq!(other.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_cart_cannot_be_settled() {
    let app = settling_app().await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "email": "a@b.co",
                "address": "12 Long Street, Springfield",
                "sessionId": "nobody",
                "total": "0",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Cart is empty"));
}

#[tokio::test]
async fn missing_product_rolls_back_settlement() {
    let app = settling_app().await;
    app.add_line("S", 1, 2).await;
    app.add_line("S", 5, 1).await;

    let db = &*app.state.db;
    db.execute_unprepared("PRAGMA foreign_keys = OFF").await.unwrap();
    Product::delete_by_id(5).exec(db).await.unwrap();
    db.execute_unprepared("PRAGMA foreign_keys = ON").await.unwrap();

    let response = app
        .request(Method::POST, "/api/orders", Some(checkout_form("S")))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_nothing_was_settled(&app, "S", 2).await;
}

#[tokio::test]
async fn failed_line_insert_rolls_back_the_order_row() {
    let app = settling_app().await;
    app.add_line("S", 1, 2).await;
    app.add_line("S", 4, 1).await;

    // The order row is written before its lines, so this fails mid-transaction.
    app.state
        .db
        .execute_unprepared(
            "CREATE TRIGGER reject_order_lines BEFORE INSERT ON order_items \
             BEGIN SELECT RAISE(ABORT, 'order lines rejected'); END",
        )
        .await
        .unwrap();

    let response = app
        .request(Method::POST, "/api/orders", Some(checkout_form("S")))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_nothing_was_settled(&app, "S", 2).await;
}

#[tokio::test]
async fn lines_that_could_not_be_cleared_abort_settlement() {
    let app = settling_app().await;
    app.add_line("S", 1, 2).await;
    app.add_line("S", 4, 1).await;

    // Keeps one line from being deleted, as if another checkout had already taken it.
    app.state
        .db
        .execute_unprepared(
            "CREATE TRIGGER keep_milk_line BEFORE DELETE ON cart_items \
             WHEN OLD.product_id = 4 BEGIN SELECT RAISE(IGNORE); END",
        )
        .await
        .unwrap();

    let response = app
        .request(Method::POST, "/api/orders", Some(checkout_form("S")))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Cart changed"));

    assert_nothing_was_settled(&app, "S", 2).await;
}
