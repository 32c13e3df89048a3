//! Stock movement models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of stock movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods received into stock (purchase, NF-e entry)
    Inbound,
    /// Goods shipped out of stock
    Outbound,
    /// Goods returned by a customer, back into stock
    Return,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Inbound => "inbound",
            MovementType::Outbound => "outbound",
            MovementType::Return => "return",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "inbound" => Some(MovementType::Inbound),
            "outbound" => Some(MovementType::Outbound),
            "return" => Some(MovementType::Return),
            _ => None,
        }
    }

    /// Sign applied to line quantities during balance replay: inbound and
    /// return movements add stock, outbound movements remove it.
    pub fn multiplier(&self) -> Decimal {
        match self {
            MovementType::Inbound | MovementType::Return => Decimal::ONE,
            MovementType::Outbound => -Decimal::ONE,
        }
    }
}

fn default_unit() -> String {
    "UN".to_string()
}

/// One product line within a movement
///
/// Fields are permissive on input: records imported from older data may miss
/// numeric fields (read as zero) or the name (read as empty). A line with an
/// empty name or non-positive quantity is "incomplete" and never persisted
/// or aggregated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductLine {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    /// Unit of measure label, free text
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub quantity: Decimal,
    /// Unit price
    #[serde(default)]
    pub price: Decimal,
    /// Derived `quantity × price`; recomputed by the writer whenever either
    /// input changes, kept on the wire for imported records
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl ProductLine {
    /// A line counts for persistence and aggregation only with a name and a
    /// positive quantity.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.quantity > Decimal::ZERO
    }

    /// Line total, falling back to `quantity × price` when the stored total
    /// is absent.
    pub fn line_total(&self) -> Decimal {
        self.total.unwrap_or_else(|| self.quantity * self.price)
    }

    /// Aggregation key: `code + "|" + name`. An empty code is a valid,
    /// distinct key segment, so identically named products with different
    /// codes stay separate stock entries.
    pub fn stock_key(&self) -> String {
        format!("{}|{}", self.code, self.name)
    }
}

/// A recorded stock movement for a company
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: Uuid,
    pub company_id: Uuid,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    /// Calendar date of the movement, no time component
    pub date: NaiveDate,
    /// Invoice (NF-e) number, when backed by an invoice
    pub nfe: Option<String>,
    pub products: Vec<ProductLine>,
    /// Sum of the line totals, maintained by the writer
    pub total_value: Decimal,
    pub image_path: Option<String>,
    pub xml_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Drop incomplete lines and recompute each surviving line's total.
    pub fn sanitize_lines(lines: Vec<ProductLine>) -> Vec<ProductLine> {
        lines
            .into_iter()
            .filter(ProductLine::is_complete)
            .map(|mut line| {
                line.total = Some(line.quantity * line.price);
                line
            })
            .collect()
    }

    /// Movement total: sum of the complete line totals.
    pub fn compute_total(lines: &[ProductLine]) -> Decimal {
        lines
            .iter()
            .filter(|l| l.is_complete())
            .map(|l| l.line_total())
            .sum()
    }
}
