mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};

#[tokio::test]
async fn lists_seeded_products_with_decimal_string_prices() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let products = body.as_array().expect("array of products");
    assert_eq!(products.len(), 5);
    assert_eq!(products[0]["name"], "Fresh Produce Bundle");
    assert_eq!(products[0]["price"], "15.99");
    assert_eq!(products[0]["categoryId"], 1);
    assert_eq!(products[3]["name"], "Fresh Milk");
    assert_eq!(products[3]["price"], "3.99");
}

#[tokio::test]
async fn lists_categories_in_id_order() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/categories", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Fruits & Vegetables", "Dairy & Eggs", "Bakery", "Beverages"]
    );
}

#[tokio::test]
async fn filters_products_by_category() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/products/category/2", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["categoryId"] == 2));
}

#[tokio::test]
async fn empty_category_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/products/category/99", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No products found for this category"));
}

#[tokio::test]
async fn non_integer_category_id_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/products/category/abc", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Invalid category ID"));
}
