use super::common::{json_body, success_response};
use crate::{
    entities::OrderModel,
    errors::ServiceError,
    services::orders::PlaceOrderInput,
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/api/orders",
    summary = "Place order",
    description = "Creates an order from the checkout form and the client's total",
    request_body = PlaceOrderInput,
    responses(
        (status = 200, description = "Order created", body = OrderModel,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid email, address or session", body = crate::errors::ErrorResponse),
        (status = 404, description = "Cart references a missing product", body = crate::errors::ErrorResponse),
        (status = 409, description = "Cart changed while it was being settled", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage unavailable", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<PlaceOrderInput>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = json_body(payload)?;
    let order = state.services.orders.place_order(input).await?;
    Ok(success_response(order))
}
