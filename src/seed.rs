//! Starter catalog inserted on first start.

use crate::{
    entities::{category, product, Category, Product},
    errors::ServiceError,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use tracing::info;

struct SeedCategory {
    name: &'static str,
    image: &'static str,
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: &'static str,
    image: &'static str,
    /// Index into `CATEGORIES`
    category: usize,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Fruits & Vegetables",
        image: "https://images.unsplash.com/photo-1558770147-a0e2842c5ea1",
    },
    SeedCategory {
        name: "Dairy & Eggs",
        image: "https://images.unsplash.com/photo-1558770147-68c0607adb26",
    },
    SeedCategory {
        name: "Bakery",
        image: "https://images.unsplash.com/photo-1558770147-d2a384e1ad85",
    },
    SeedCategory {
        name: "Beverages",
        image: "https://images.unsplash.com/photo-1524871729950-c4e886edc1f9",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Fresh Produce Bundle",
        description: "Assorted fresh vegetables",
        price: "15.99",
        image: "https://images.unsplash.com/photo-1556767576-5ec41e3239ea",
        category: 0,
    },
    SeedProduct {
        name: "Organic Eggs",
        description: "Farm fresh eggs",
        price: "5.99",
        image: "https://images.unsplash.com/photo-1584680226833-0d680d0a0794",
        category: 1,
    },
    SeedProduct {
        name: "Artisan Bread",
        description: "Freshly baked bread",
        price: "4.99",
        image: "https://images.unsplash.com/photo-1515706886582-54c73c5eaf41",
        category: 2,
    },
    SeedProduct {
        name: "Fresh Milk",
        description: "Whole milk",
        price: "3.99",
        image: "https://images.unsplash.com/photo-1607349913338-fca6f7fc42d0",
        category: 1,
    },
    SeedProduct {
        name: "Orange Juice",
        description: "Fresh squeezed",
        price: "6.99",
        image: "https://images.unsplash.com/photo-1526470498-9ae73c665de8",
        category: 3,
    },
];

/// Outcome of a seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_inserted: usize,
    pub products_inserted: usize,
}

/// Inserts the starter categories and products, each only when its table is empty.
pub async fn seed_catalog(db: &DatabaseConnection) -> Result<SeedReport, ServiceError> {
    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    if Category::find().count(&txn).await? == 0 {
        for seed in CATEGORIES {
            category::ActiveModel {
                name: Set(seed.name.to_string()),
                image: Set(seed.image.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            report.categories_inserted += 1;
        }
    }

    if Product::find().count(&txn).await? == 0 {
        // Resolve category references by name so ids need not start at 1
        let categories = Category::find().all(&txn).await?;
        for seed in PRODUCTS {
            let category_id = categories
                .iter()
                .find(|c| c.name == CATEGORIES[seed.category].name)
                .map(|c| c.id);
            product::ActiveModel {
                name: Set(seed.name.to_string()),
                description: Set(seed.description.to_string()),
                price: Set(seed.price.to_string()),
                image: Set(seed.image.to_string()),
                category_id: Set(category_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            report.products_inserted += 1;
        }
    }

    txn.commit().await?;

    if report != SeedReport::default() {
        info!(
            categories = report.categories_inserted,
            products = report.products_inserted,
            "seeded starter catalog"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate_rows() {
        let db = establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .unwrap();
        run_migrations(&db).await.unwrap();

        let first = seed_catalog(&db).await.unwrap();
        assert_eq!(first.categories_inserted, 4);
        assert_eq!(first.products_inserted, 5);

        let second = seed_catalog(&db).await.unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(Product::find().count(&db).await.unwrap(), 5);
        assert_eq!(Category::find().count(&db).await.unwrap(), 4);
    }
}
