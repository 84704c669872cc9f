//! Cart endpoints.
//!
//! `/api/cart/:key` is shared: GET and POST read `key` as a session id, PUT
//! and DELETE read it as a cart item id.

use super::common::{json_body, no_content_response, parse_path_id, success_response, validate_input};
use crate::{entities::CartItemModel, errors::ServiceError, session::SessionId, AppState};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    #[schema(example = 1)]
    pub product_id: i32,
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    #[schema(example = 3)]
    pub quantity: i32,
}

#[utoipa::path(
    get,
    path = "/api/cart/{sessionId}",
    summary = "List cart lines",
    params(("sessionId" = String, Path, description = "Opaque session token, percent-encoded")),
    responses(
        (status = 200, description = "Lines of the session's cart", body = Vec<CartItemModel>),
        (status = 400, description = "Empty session id", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "cart"
)]
pub async fn list_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let session_id = SessionId::parse(session_id)?;
    let lines = state.services.cart.list_lines(&session_id).await?;
    Ok(success_response(lines))
}

#[utoipa::path(
    post,
    path = "/api/cart/{sessionId}",
    summary = "Add cart line",
    description = "Always appends a new line, even for a product already in the cart",
    params(("sessionId" = String, Path, description = "Opaque session token, percent-encoded")),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Line created", body = CartItemModel),
        (status = 400, description = "Malformed body or negative quantity", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<AddCartItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let session_id = SessionId::parse(session_id)?;
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let item = state
        .services
        .cart
        .add_line(&session_id, payload.product_id, payload.quantity)
        .await?;
    Ok(success_response(item))
}

#[utoipa::path(
    put,
    path = "/api/cart/{itemId}",
    summary = "Update cart line quantity",
    description = "A quantity of 0 keeps the line",
    params(("itemId" = String, Path, description = "Cart item id")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Line updated", body = CartItemModel),
        (status = 400, description = "Invalid id or body", body = crate::errors::ErrorResponse),
        (status = 404, description = "Cart item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    payload: Result<Json<UpdateCartItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let item_id = parse_path_id(&item_id, "Invalid cart item ID")?;
    let payload = json_body(payload)?;
    validate_input(&payload)?;

    let item = state
        .services
        .cart
        .update_quantity(item_id, payload.quantity)
        .await?;
    Ok(success_response(item))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{itemId}",
    summary = "Remove cart line",
    description = "Idempotent: removing an absent line also returns 204",
    params(("itemId" = String, Path, description = "Cart item id")),
    responses(
        (status = 204, description = "Line removed"),
        (status = 400, description = "Invalid id", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "cart"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let item_id = parse_path_id(&item_id, "Invalid cart item ID")?;
    state.services.cart.remove_line(item_id).await?;
    Ok(no_content_response())
}
