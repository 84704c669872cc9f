use crate::entities::{CartItemModel, ProductModel};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// One cart line as displayed to the shopper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub item_id: i32,
    pub product_id: i32,
    pub name: Option<String>,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub line_total: Decimal,
}

/// Client-side cart valuation.
///
/// Lines whose product is not in the catalog listing, or whose price does not
/// parse, are shown but contribute nothing to the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub lines: Vec<SummaryLine>,
    pub item_count: i64,
    pub total: Decimal,
}

impl CartSummary {
    pub fn build(lines: &[CartItemModel], products: &[ProductModel]) -> Self {
        let by_id: HashMap<i32, &ProductModel> = products.iter().map(|p| (p.id, p)).collect();

        let lines: Vec<SummaryLine> = lines
            .iter()
            .map(|line| {
                let product = by_id.get(&line.product_id);
                let unit_price = product.and_then(|p| p.unit_price().ok());
                let line_total = unit_price
                    .map(|price| price * Decimal::from(line.quantity))
                    .unwrap_or(Decimal::ZERO);
                SummaryLine {
                    item_id: line.id,
                    product_id: line.product_id,
                    name: product.map(|p| p.name.clone()),
                    quantity: line.quantity,
                    unit_price,
                    line_total,
                }
            })
            .collect();

        let total = lines.iter().map(|l| l.line_total).sum();
        let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();

        Self {
            lines,
            item_count,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn find(&self, item_id: i32) -> Option<&SummaryLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }
}
