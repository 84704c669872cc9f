use crate::{
    config::CheckoutConfig,
    entities::{order, order_item, OrderModel},
    errors::ServiceError,
    services::{
        cart::{price_lines, CartService},
        catalog::CatalogService,
    },
    session::SessionId,
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Checkout form submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderInput {
    pub session_id: String,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "a@b.co")]
    pub email: String,
    #[schema(example = "12 Long Street, Springfield")]
    pub address: String,
    /// Amount computed by the client
    #[schema(value_type = String, example = "35.97")]
    pub total: Decimal,
}

/// Turns checkout forms into persisted orders.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    policy: CheckoutConfig,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, policy: CheckoutConfig) -> Self {
        Self { db, policy }
    }

    /// Validates and persists an order.
    ///
    /// By default the caller's total is stored verbatim and the cart is left
    /// untouched. With `settle_from_cart` the order is settled from the
    /// session's cart instead, see [`OrderService::settle_from_cart`].
    #[instrument(skip(self, input), fields(session_id = %input.session_id))]
    pub async fn place_order(&self, input: PlaceOrderInput) -> Result<OrderModel, ServiceError> {
        let session_id = self.validate_input(&input)?;

        let order = if self.policy.settle_from_cart {
            self.settle_from_cart(&session_id, &input).await?
        } else {
            order::ActiveModel {
                session_id: Set(session_id.into_inner()),
                email: Set(input.email.trim().to_string()),
                address: Set(input.address.trim().to_string()),
                total: Set(input.total.to_string()),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&*self.db)
            .await?
        };

        counter!("storefront_orders_placed_total", 1);
        info!(order_id = order.id, total = %order.total, "order placed");
        Ok(order)
    }

    fn validate_input(&self, input: &PlaceOrderInput) -> Result<SessionId, ServiceError> {
        input.validate()?;

        let session_id = SessionId::parse(&input.session_id)?;

        let min = self.policy.min_address_length;
        if input.address.trim().chars().count() < min {
            return Err(ServiceError::ValidationError(format!(
                "Address must be at least {} characters",
                min
            )));
        }

        Ok(session_id)
    }

    /// Recomputes the total from the cart, writes order lines and removes the
    /// lines it read in one transaction. Any failure rolls the whole unit back.
    /// Lines added to the cart while this runs stay in the cart.
    async fn settle_from_cart(
        &self,
        session_id: &SessionId,
        input: &PlaceOrderInput,
    ) -> Result<OrderModel, ServiceError> {
        let txn = self.db.begin().await?;

        let lines = CartService::lines_for_settlement(&txn, session_id).await?;
        let mut product_ids: Vec<i32> = lines.iter().map(|line| line.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        let products = CatalogService::products_by_ids(&txn, &product_ids).await?;

        let priced = price_lines(&lines, &products)?;
        if priced.lines.is_empty() {
            return Err(ServiceError::ValidationError("Cart is empty".to_string()));
        }
        if priced.total != input.total {
            warn!(
                submitted = %input.total,
                computed = %priced.total,
                "submitted total differs from cart; using computed total"
            );
        }

        let order = order::ActiveModel {
            session_id: Set(session_id.as_str().to_string()),
            email: Set(input.email.trim().to_string()),
            address: Set(input.address.trim().to_string()),
            total: Set(priced.total.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for line in &priced.lines {
            order_item::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let line_ids: Vec<i32> = lines.iter().map(|line| line.id).collect();
        let cleared = CartService::clear_session(&txn, session_id, &line_ids).await?;
        if cleared != line_ids.len() as u64 {
            // Another checkout consumed some of these lines; dropping `txn` rolls back.
            return Err(ServiceError::Conflict(
                "Cart changed during checkout".to_string(),
            ));
        }
        txn.commit().await?;

        info!(order_id = order.id, cleared, "settled order from cart");
        Ok(order)
    }
}
