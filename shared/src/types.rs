//! Common types used across the system

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Movement, MovementType};

/// Query descriptor for movement listings
///
/// The movement store applies this in SQL; `matches` gives the equivalent
/// in-memory predicate for callers that pre-filter before aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementFilter {
    pub company_id: Option<Uuid>,
    pub movement_type: Option<MovementType>,
    /// Inclusive lower date bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub end_date: Option<NaiveDate>,
    /// Inclusive lower bound on the movement total
    pub min_value: Option<Decimal>,
    /// Inclusive upper bound on the movement total
    pub max_value: Option<Decimal>,
    /// Case-insensitive substring match on product names
    pub product: Option<String>,
}

impl MovementFilter {
    pub fn is_empty(&self) -> bool {
        self.company_id.is_none()
            && self.movement_type.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.min_value.is_none()
            && self.max_value.is_none()
            && self.product.is_none()
    }

    pub fn matches(&self, movement: &Movement) -> bool {
        if let Some(company_id) = self.company_id {
            if movement.company_id != company_id {
                return false;
            }
        }
        if let Some(movement_type) = self.movement_type {
            if movement.movement_type != movement_type {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if movement.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if movement.date > end {
                return false;
            }
        }
        if let Some(min) = self.min_value {
            if movement.total_value < min {
                return false;
            }
        }
        if let Some(max) = self.max_value {
            if movement.total_value > max {
                return false;
            }
        }
        if let Some(product) = &self.product {
            let needle = product.to_lowercase();
            if !movement
                .products
                .iter()
                .any(|l| l.name.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }
}
