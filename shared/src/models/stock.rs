//! Stock balance output models
//!
//! These are computed views over the movement history, never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current stock position of one product key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    pub code: String,
    pub name: String,
    /// Running signed quantity
    pub quantity: Decimal,
    /// Weighted-average unit cost, moved only by stock-increasing movements
    pub avg_price: Decimal,
    /// `quantity × avg_price`
    pub total_value: Decimal,
    /// Display name of the company that introduced the product key
    pub company: String,
}

impl StockItem {
    /// The `(code, name)` aggregation key this item was accumulated under.
    pub fn key(&self) -> String {
        format!("{}|{}", self.code, self.name)
    }
}

/// Aggregate totals over the reported stock items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockSummary {
    pub total_products: usize,
    pub total_quantity: Decimal,
    pub total_value: Decimal,
}

/// Full result of a balance computation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockBalance {
    pub products: Vec<StockItem>,
    pub summary: StockSummary,
}
