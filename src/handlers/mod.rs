pub mod cart;
pub mod catalog;
pub mod common;
pub mod orders;

use crate::{config::AppConfig, db::DbPool, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Services layer used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::CatalogService>,
    pub cart: Arc<crate::services::CartService>,
    pub orders: Arc<crate::services::OrderService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            catalog: Arc::new(crate::services::CatalogService::new(db_pool.clone())),
            cart: Arc::new(crate::services::CartService::new(db_pool.clone())),
            orders: Arc::new(crate::services::OrderService::new(
                db_pool,
                config.checkout.clone(),
            )),
        }
    }
}

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route(
            "/products/category/:id",
            get(catalog::list_products_by_category),
        )
        .route("/categories", get(catalog::list_categories))
        .route(
            "/cart/:key",
            get(cart::list_cart)
                .post(cart::add_to_cart)
                .put(cart::update_cart_item)
                .delete(cart::remove_cart_item),
        )
        .route("/orders", post(orders::place_order))
}
