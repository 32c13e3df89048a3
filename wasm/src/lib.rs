//! WebAssembly module for the Estoque inventory system
//!
//! Provides client-side computation for:
//! - Stock balance aggregation over a local movement cache
//! - Movement and line total calculations
//! - Offline CNPJ validation

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Compute the stock balance over a JSON array of movements.
///
/// `companies_json` maps company id to display name; `company_filter`
/// optionally restricts the balance to one company. Returns the balance as a
/// JSON string.
#[wasm_bindgen]
pub fn compute_stock_balance(
    movements_json: &str,
    companies_json: &str,
    company_filter: Option<String>,
) -> Result<String, JsValue> {
    let movements: Vec<Movement> = serde_json::from_str(movements_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid movements JSON: {}", e)))?;
    let companies: HashMap<Uuid, String> = serde_json::from_str(companies_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid companies JSON: {}", e)))?;
    let filter = match company_filter {
        Some(id) => Some(
            Uuid::parse_str(&id)
                .map_err(|e| JsValue::from_str(&format!("Invalid company id: {}", e)))?,
        ),
        None => None,
    };

    let balance = shared::balance::compute_balance(&movements, &companies, filter);
    serde_json::to_string(&balance)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Total value of a JSON array of product lines, skipping incomplete lines
#[wasm_bindgen]
pub fn calculate_movement_total(products_json: &str) -> Result<f64, JsValue> {
    let products: Vec<ProductLine> = serde_json::from_str(products_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid products JSON: {}", e)))?;

    let total = Movement::compute_total(&products);
    Ok(total.to_string().parse().unwrap_or(0.0))
}

/// Line total for a quantity and unit price
#[wasm_bindgen]
pub fn calculate_line_total(quantity: f64, price: f64) -> f64 {
    let quantity = Decimal::try_from(quantity).unwrap_or(Decimal::ZERO);
    let price = Decimal::try_from(price).unwrap_or(Decimal::ZERO);
    (quantity * price).to_string().parse().unwrap_or(0.0)
}

/// Check a CNPJ, accepting formatted or bare input
#[wasm_bindgen]
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    validate_cnpj(cnpj).is_ok()
}

/// Strip CNPJ formatting down to its 14 digits
#[wasm_bindgen]
pub fn strip_cnpj(cnpj: &str) -> String {
    normalize_cnpj(cnpj)
}

/// Check a Brazilian phone number, with or without the country code
#[wasm_bindgen]
pub fn is_valid_phone(phone: &str) -> bool {
    validate_brazilian_phone(phone).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_stock_balance_from_json() {
        let company = "00000000-0000-0000-0000-000000000001";
        let movements = format!(
            r#"[{{
                "id": "00000000-0000-0000-0000-00000000000a",
                "company_id": "{company}",
                "type": "inbound",
                "date": "2024-01-01",
                "nfe": null,
                "products": [{{"code": "X1", "name": "Widget", "unit": "UN", "quantity": "10", "price": "5", "total": "50"}}],
                "total_value": "50",
                "image_path": null,
                "xml_path": null,
                "notes": null,
                "created_at": "2024-01-01T12:00:00Z"
            }}]"#
        );
        let companies = format!(r#"{{"{company}": "Acme"}}"#);

        let result = compute_stock_balance(&movements, &companies, None).unwrap();
        let balance: StockBalance = serde_json::from_str(&result).unwrap();

        assert_eq!(balance.summary.total_products, 1);
        assert_eq!(balance.products[0].company, "Acme");
    }

    #[test]
    fn test_calculate_movement_total_skips_incomplete() {
        let products = r#"[
            {"code": "A", "name": "Bolt", "quantity": "4", "price": "2.5"},
            {"code": "B", "name": "", "quantity": "9", "price": "1"}
        ]"#;

        let total = calculate_movement_total(products).unwrap();
        assert!((total - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_calculate_line_total() {
        assert!((calculate_line_total(3.0, 2.5) - 7.5).abs() < 0.001);
        assert_eq!(calculate_line_total(0.0, 2.5), 0.0);
    }

    #[test]
    fn test_cnpj_helpers() {
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(!is_valid_cnpj("11.222.333/0001-82"));
        assert_eq!(strip_cnpj("11.222.333/0001-81"), "11222333000181");
    }

    #[test]
    fn test_phone_helper() {
        assert!(is_valid_phone("(11) 93333-4444"));
        assert!(is_valid_phone("+55 11 93333-4444"));
        assert!(!is_valid_phone("12345"));
    }
}
