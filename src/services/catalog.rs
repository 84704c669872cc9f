use crate::{
    entities::{category, product, Category, CategoryModel, Product, ProductModel},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Read-only access to categories and products.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists every product in storage order.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductModel>, ServiceError> {
        let products = Product::find()
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?;
        debug!(count = products.len(), "listed products");
        Ok(products)
    }

    /// Lists the products of one category.
    ///
    /// An empty result is reported as `NotFound`, so an unknown category id and a
    /// category without products look the same to callers.
    #[instrument(skip(self))]
    pub async fn list_products_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        let products = Product::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(&*self.db)
            .await?;

        if products.is_empty() {
            info!(category_id, "no products found for category");
            return Err(ServiceError::NotFound(
                "No products found for this category".to_string(),
            ));
        }

        debug!(category_id, count = products.len(), "filtered products by category");
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        Ok(Category::find()
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn find_product(&self, product_id: i32) -> Result<Option<ProductModel>, ServiceError> {
        Ok(Product::find_by_id(product_id).one(&*self.db).await?)
    }

    /// Loads the given products on any connection, including an open transaction.
    pub(crate) async fn products_by_ids<C>(
        conn: &C,
        product_ids: &[i32],
    ) -> Result<Vec<ProductModel>, ServiceError>
    where
        C: ConnectionTrait,
    {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(Product::find()
            .filter(product::Column::Id.is_in(product_ids.iter().copied()))
            .all(conn)
            .await?)
    }
}
