//! Stock balance engine
//!
//! Replays the full movement history in chronological order and derives the
//! current on-hand quantity, weighted-average unit cost and valuation per
//! product key. The computation is a pure fold over its inputs: no I/O, no
//! shared state, safe to run concurrently on immutable snapshots and cheap
//! enough to recompute from scratch on every mutation.
//!
//! Replay order is a correctness invariant, not a convenience: the
//! weighted-average cost is path-dependent, so callers relying on a specific
//! same-date ordering must pass movements in their insertion order (the sort
//! here is stable and only orders by date).

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Movement, StockBalance, StockItem, StockSummary};

/// Label reported when a movement's company id cannot be resolved
pub const UNKNOWN_COMPANY: &str = "N/A";

/// Compute the stock balance over a movement history.
///
/// `companies` maps company id to display name and is used only to label the
/// resulting items. When `company_filter` is set, movements of other
/// companies are ignored entirely.
///
/// Malformed historical records never abort the computation: missing numeric
/// fields count as zero and lines without a name or positive quantity are
/// skipped, so one bad record cannot take down balance reporting.
pub fn compute_balance(
    movements: &[Movement],
    companies: &HashMap<Uuid, String>,
    company_filter: Option<Uuid>,
) -> StockBalance {
    let mut ordered: Vec<&Movement> = movements
        .iter()
        .filter(|m| company_filter.map_or(true, |id| m.company_id == id))
        .collect();
    // Stable: same-date movements keep the caller's insertion order
    ordered.sort_by_key(|m| m.date);

    let mut records: HashMap<String, StockItem> = HashMap::new();
    for movement in ordered {
        let company = companies
            .get(&movement.company_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COMPANY);
        apply_movement(&mut records, movement, company);
    }

    // Exhausted or never-positive stock is not reported
    let mut products: Vec<StockItem> = records
        .into_values()
        .filter(|item| item.quantity > Decimal::ZERO)
        .collect();
    products.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.key().cmp(&b.key()))
    });

    let summary = StockSummary {
        total_products: products.len(),
        total_quantity: products.iter().map(|p| p.quantity).sum(),
        total_value: products.iter().map(|p| p.total_value).sum(),
    };

    StockBalance { products, summary }
}

/// Fold a single movement into the accumulator.
fn apply_movement(records: &mut HashMap<String, StockItem>, movement: &Movement, company: &str) {
    let multiplier = movement.movement_type.multiplier();

    for line in movement.products.iter().filter(|l| l.is_complete()) {
        let record = records.entry(line.stock_key()).or_insert_with(|| StockItem {
            code: line.code.clone(),
            name: line.name.clone(),
            quantity: Decimal::ZERO,
            avg_price: line.price,
            total_value: Decimal::ZERO,
            company: company.to_string(),
        });

        let delta = line.quantity * multiplier;
        let new_quantity = record.quantity + delta;

        // The average cost moves only when stock increases: value the stock
        // held so far at the old average, add this line at its own price and
        // spread the blend across the new quantity. Outbound decrements
        // leave the average untouched.
        if multiplier > Decimal::ZERO && line.quantity > Decimal::ZERO {
            let prior_value = record.avg_price * (new_quantity - delta);
            let new_total = prior_value + line.line_total();
            if new_quantity > Decimal::ZERO {
                record.avg_price = new_total / new_quantity;
            }
        }

        record.quantity = new_quantity;
        record.total_value = record.quantity * record.avg_price;
    }
}
