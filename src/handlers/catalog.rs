use super::common::{parse_path_id, success_response};
use crate::{
    entities::{CategoryModel, ProductModel},
    errors::ServiceError,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/products",
    summary = "List products",
    description = "All products in the catalog",
    responses(
        (status = 200, description = "Products retrieved", body = Vec<ProductModel>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.services.catalog.list_products().await?;
    Ok(success_response(products))
}

#[utoipa::path(
    get,
    path = "/api/products/category/{id}",
    summary = "List products by category",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Products in the category", body = Vec<ProductModel>),
        (status = 400, description = "Category id is not an integer", body = crate::errors::ErrorResponse),
        (status = 404, description = "No products found for this category", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "catalog"
)]
pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let category_id = parse_path_id(&id, "Invalid category ID")?;
    let products = state
        .services
        .catalog
        .list_products_by_category(category_id)
        .await?;
    Ok(success_response(products))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    summary = "List categories",
    responses(
        (status = 200, description = "Categories retrieved", body = Vec<CategoryModel>),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let categories = state.services.catalog.list_categories().await?;
    Ok(success_response(categories))
}
