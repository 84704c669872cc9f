use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Catalog product. `price` is kept as an exact decimal string.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
#[schema(as = Product)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[schema(example = "15.99")]
    pub price: String,
    pub image: String,
    pub category_id: Option<i32>,
}

impl Model {
    /// Parses the stored price. Malformed or negative prices are rejected.
    pub fn unit_price(&self) -> Result<Decimal, rust_decimal::Error> {
        let price = Decimal::from_str(self.price.trim())?;
        if price.is_sign_negative() {
            return Err(rust_decimal::Error::ConversionTo(format!(
                "negative price {} on product {}",
                self.price, self.id
            )));
        }
        Ok(price)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
