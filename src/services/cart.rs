use crate::{
    entities::{cart_item, CartItem, CartItemModel, ProductModel},
    errors::ServiceError,
    session::SessionId,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, Unchanged,
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};

/// Session-scoped cart lines.
///
/// Every operation is a single statement. Adding never merges with an existing
/// line for the same product, and a quantity of zero keeps the row; only
/// [`CartService::remove_line`] deletes.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Appends a new line to the session's cart. An unknown product is a validation error.
    #[instrument(skip(self, session_id), fields(session_id = %session_id))]
    pub async fn add_line(
        &self,
        session_id: &SessionId,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartItemModel, ServiceError> {
        let item = cart_item::ActiveModel {
            session_id: Set(session_id.as_str().to_string()),
            product_id: Set(product_id),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ServiceError::ValidationError(format!("Product {} does not exist", product_id))
            }
            _ => ServiceError::from(e),
        })?;

        info!(item_id = item.id, product_id, quantity, "added cart line");
        Ok(item)
    }

    /// Overwrites the quantity of one line. Concurrent updates are last-write-wins.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        item_id: i32,
        quantity: i32,
    ) -> Result<CartItemModel, ServiceError> {
        let update = cart_item::ActiveModel {
            id: Unchanged(item_id),
            quantity: Set(quantity),
            ..Default::default()
        };

        match update.update(&*self.db).await {
            Ok(item) => {
                info!(item_id, quantity, "updated cart line quantity");
                Ok(item)
            }
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Err(
                ServiceError::NotFound(format!("Cart item {} not found", item_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a line. Removing an absent line succeeds.
    #[instrument(skip(self))]
    pub async fn remove_line(&self, item_id: i32) -> Result<(), ServiceError> {
        let result = CartItem::delete_by_id(item_id).exec(&*self.db).await?;
        info!(item_id, removed = result.rows_affected, "removed cart line");
        Ok(())
    }

    /// Lists the session's lines in insertion order.
    #[instrument(skip(self, session_id), fields(session_id = %session_id))]
    pub async fn list_lines(&self, session_id: &SessionId) -> Result<Vec<CartItemModel>, ServiceError> {
        Self::lines_for_session(&*self.db, session_id).await
    }

    pub(crate) async fn lines_for_session<C>(
        conn: &C,
        session_id: &SessionId,
    ) -> Result<Vec<CartItemModel>, ServiceError>
    where
        C: ConnectionTrait,
    {
        Ok(CartItem::find()
            .filter(cart_item::Column::SessionId.eq(session_id.as_str()))
            .order_by_asc(cart_item::Column::Id)
            .all(conn)
            .await?)
    }

    /// Reads the session's lines for checkout. On Postgres the rows stay
    /// locked until the surrounding transaction ends, so a concurrent
    /// settlement of the same session waits and then sees the cleared cart.
    pub(crate) async fn lines_for_settlement<C>(
        conn: &C,
        session_id: &SessionId,
    ) -> Result<Vec<CartItemModel>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut query = CartItem::find()
            .filter(cart_item::Column::SessionId.eq(session_id.as_str()))
            .order_by_asc(cart_item::Column::Id);
        if conn.get_database_backend() == DbBackend::Postgres {
            query = query.lock_exclusive();
        }
        Ok(query.all(conn).await?)
    }

    /// Deletes the given lines of the session and returns how many were removed.
    ///
    /// Lines added after `line_ids` was read are left in place.
    pub async fn clear_session<C>(
        conn: &C,
        session_id: &SessionId,
        line_ids: &[i32],
    ) -> Result<u64, ServiceError>
    where
        C: ConnectionTrait,
    {
        if line_ids.is_empty() {
            return Ok(0);
        }
        let result = CartItem::delete_many()
            .filter(cart_item::Column::SessionId.eq(session_id.as_str()))
            .filter(cart_item::Column::Id.is_in(line_ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

/// A cart line joined to its product's current price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Server-side valuation of a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total: Decimal,
}

/// Prices every line with a positive quantity as unit price × quantity.
///
/// Unlike the client-side summary, a line whose product is missing is an error.
pub fn price_lines(
    lines: &[CartItemModel],
    products: &[ProductModel],
) -> Result<PricedCart, ServiceError> {
    let by_id: HashMap<i32, &ProductModel> = products.iter().map(|p| (p.id, p)).collect();

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;
    for line in lines.iter().filter(|line| line.quantity > 0) {
        let product = by_id.get(&line.product_id).ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Product {} referenced by cart item {} not found",
                line.product_id, line.id
            ))
        })?;
        let unit_price = product.unit_price().map_err(|e| {
            ServiceError::InternalError(format!("Invalid price on product {}: {}", product.id, e))
        })?;
        let line_total = unit_price * Decimal::from(line.quantity);
        total += line_total;
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
            line_total,
        });
    }

    Ok(PricedCart {
        lines: priced,
        total,
    })
}
