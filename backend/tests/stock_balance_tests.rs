//! Stock balance engine tests
//!
//! Exercises the replay over movement histories:
//! - reported quantities are the signed sums of the history
//! - exhausted products never appear in the report
//! - the weighted-average cost stays bounded by the inbound prices
//! - recomputation is deterministic and order-insensitive on distinct dates

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::balance::compute_balance;
use shared::models::{Movement, MovementType, ProductLine};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn company_id() -> Uuid {
    Uuid::from_u128(1)
}

fn directory() -> HashMap<Uuid, String> {
    HashMap::from([(company_id(), "Acme Ltda".to_string())])
}

fn line(code: &str, name: &str, quantity: Decimal, price: Decimal) -> ProductLine {
    ProductLine {
        code: code.to_string(),
        name: name.to_string(),
        unit: "UN".to_string(),
        quantity,
        price,
        total: Some(quantity * price),
    }
}

/// Build a movement on day `day` of a fixed month
fn movement(movement_type: MovementType, day: u32, products: Vec<ProductLine>) -> Movement {
    let total_value = Movement::compute_total(&products);
    Movement {
        id: Uuid::new_v4(),
        company_id: company_id(),
        movement_type,
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        nfe: None,
        products,
        total_value,
        image_path: None,
        xml_path: None,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_multi_product_movement_splits_into_items() {
        let movements = vec![movement(
            MovementType::Inbound,
            1,
            vec![
                line("A", "Arruela", dec("100"), dec("0.10")),
                line("B", "Parafuso", dec("50"), dec("0.25")),
            ],
        )];

        let balance = compute_balance(&movements, &directory(), None);

        assert_eq!(balance.products.len(), 2);
        assert_eq!(balance.summary.total_products, 2);
        assert_eq!(balance.summary.total_quantity, dec("150"));
        assert_eq!(balance.summary.total_value, dec("22.50"));
    }

    #[test]
    fn test_interleaved_history_blends_in_date_order() {
        // 10 @ 5, sell 4, buy 6 @ 10: blend = (6 * 5 + 60) / 12 = 7.5
        let movements = vec![
            movement(MovementType::Inbound, 1, vec![line("X", "Widget", dec("10"), dec("5"))]),
            movement(MovementType::Outbound, 2, vec![line("X", "Widget", dec("4"), dec("5"))]),
            movement(MovementType::Inbound, 3, vec![line("X", "Widget", dec("6"), dec("10"))]),
        ];

        let balance = compute_balance(&movements, &directory(), None);

        let item = &balance.products[0];
        assert_eq!(item.quantity, dec("12"));
        assert_eq!(item.avg_price, dec("7.5"));
        assert_eq!(item.total_value, dec("90"));
    }

    #[test]
    fn test_restock_after_exhaustion_takes_new_price() {
        // Sell everything, then restock at a new price. The blend spreads the
        // new line over the new quantity alone, so the old average is gone.
        let movements = vec![
            movement(MovementType::Inbound, 1, vec![line("X", "Widget", dec("10"), dec("5"))]),
            movement(MovementType::Outbound, 2, vec![line("X", "Widget", dec("10"), dec("5"))]),
            movement(MovementType::Inbound, 3, vec![line("X", "Widget", dec("4"), dec("8"))]),
        ];

        let balance = compute_balance(&movements, &directory(), None);

        let item = &balance.products[0];
        assert_eq!(item.quantity, dec("4"));
        assert_eq!(item.avg_price, dec("8"));
        assert_eq!(item.total_value, dec("32"));
    }

    #[test]
    fn test_fractional_quantities() {
        let movements = vec![
            movement(MovementType::Inbound, 1, vec![line("K", "Cabo", dec("2.5"), dec("4"))]),
            movement(MovementType::Outbound, 2, vec![line("K", "Cabo", dec("0.5"), dec("4"))]),
        ];

        let balance = compute_balance(&movements, &directory(), None);

        let item = &balance.products[0];
        assert_eq!(item.quantity, dec("2.0"));
        assert_eq!(item.avg_price, dec("4"));
        assert_eq!(item.total_value, dec("8.0"));
    }

    #[test]
    fn test_same_date_movements_replay_in_insertion_order() {
        // Three movements on the same day. The sort on date is stable, so
        // ties replay in insertion order and the blended average depends on
        // which inbound lands before the outbound.
        let history = vec![
            movement(MovementType::Inbound, 5, vec![line("X", "Widget", dec("10"), dec("5"))]),
            movement(MovementType::Outbound, 5, vec![line("X", "Widget", dec("5"), dec("5"))]),
            movement(MovementType::Inbound, 5, vec![line("X", "Widget", dec("10"), dec("7"))]),
        ];

        let forward = compute_balance(&history, &directory(), None);
        let item = &forward.products[0];
        assert_eq!(item.quantity, dec("15"));
        // (5 remaining * 5 + 10 * 7) / 15
        assert_eq!(item.avg_price, dec("95") / dec("15"));

        let mut reversed = history.clone();
        reversed.reverse();
        let backward = compute_balance(&reversed, &directory(), None);
        let item = &backward.products[0];
        assert_eq!(item.quantity, dec("15"));
        // (5 remaining * 7 + 10 * 5) / 15
        assert_eq!(item.avg_price, dec("85") / dec("15"));
    }

    #[test]
    fn test_empty_history_yields_empty_balance() {
        let balance = compute_balance(&[], &directory(), None);

        assert!(balance.products.is_empty());
        assert_eq!(balance.summary.total_products, 0);
        assert_eq!(balance.summary.total_quantity, Decimal::ZERO);
        assert_eq!(balance.summary.total_value, Decimal::ZERO);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Positive quantities, one decimal place (0.1 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Positive unit prices, two decimal places (0.01 to 1000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn type_strategy() -> impl Strategy<Value = MovementType> {
        prop_oneof![
            Just(MovementType::Inbound),
            Just(MovementType::Outbound),
            Just(MovementType::Return),
        ]
    }

    /// Histories of up to 27 single-line movements for one product, each on
    /// its own day so replay order is fully determined by the date.
    fn history_strategy() -> impl Strategy<Value = Vec<Movement>> {
        prop::collection::vec((type_strategy(), quantity_strategy(), price_strategy()), 1..27)
            .prop_map(|entries| {
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, (movement_type, quantity, price))| {
                        movement(
                            movement_type,
                            (i + 1) as u32,
                            vec![line("X", "Widget", quantity, price)],
                        )
                    })
                    .collect()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Recomputation over the same history gives the same balance
        #[test]
        fn prop_recompute_is_deterministic(movements in history_strategy()) {
            let first = compute_balance(&movements, &directory(), None);
            let second = compute_balance(&movements, &directory(), None);
            prop_assert_eq!(first, second);
        }

        /// Input order does not matter when dates are distinct
        #[test]
        fn prop_input_order_irrelevant_on_distinct_dates(movements in history_strategy()) {
            let forward = compute_balance(&movements, &directory(), None);

            let mut reversed = movements.clone();
            reversed.reverse();
            let backward = compute_balance(&reversed, &directory(), None);

            prop_assert_eq!(forward, backward);
        }

        /// The reported quantity is the signed sum of the history, and a
        /// non-positive sum means the product is not reported at all
        #[test]
        fn prop_quantity_is_signed_sum(movements in history_strategy()) {
            let expected: Decimal = movements
                .iter()
                .map(|m| m.products[0].quantity * m.movement_type.multiplier())
                .sum();

            let balance = compute_balance(&movements, &directory(), None);

            if expected > Decimal::ZERO {
                prop_assert_eq!(balance.products.len(), 1);
                prop_assert_eq!(balance.products[0].quantity, expected);
            } else {
                prop_assert!(balance.products.is_empty());
            }
        }

        /// Every reported item has positive quantity and the summary is
        /// consistent with the item list
        #[test]
        fn prop_summary_consistent_with_items(movements in history_strategy()) {
            let balance = compute_balance(&movements, &directory(), None);

            for item in &balance.products {
                prop_assert!(item.quantity > Decimal::ZERO);
            }

            let quantity_sum: Decimal = balance.products.iter().map(|p| p.quantity).sum();
            let value_sum: Decimal = balance.products.iter().map(|p| p.total_value).sum();

            prop_assert_eq!(balance.summary.total_products, balance.products.len());
            prop_assert_eq!(balance.summary.total_quantity, quantity_sum);
            prop_assert_eq!(balance.summary.total_value, value_sum);
        }

        /// Over an all-inbound history the average cost stays within the
        /// range of the purchase prices
        #[test]
        fn prop_average_bounded_by_inbound_prices(
            entries in prop::collection::vec((quantity_strategy(), price_strategy()), 1..27)
        ) {
            let min_price = entries.iter().map(|(_, p)| *p).min().unwrap();
            let max_price = entries.iter().map(|(_, p)| *p).max().unwrap();

            let movements: Vec<Movement> = entries
                .into_iter()
                .enumerate()
                .map(|(i, (quantity, price))| {
                    movement(
                        MovementType::Inbound,
                        (i + 1) as u32,
                        vec![line("X", "Widget", quantity, price)],
                    )
                })
                .collect();

            let balance = compute_balance(&movements, &directory(), None);

            prop_assert_eq!(balance.products.len(), 1);
            let avg = balance.products[0].avg_price;
            prop_assert!(avg >= min_price);
            prop_assert!(avg <= max_price);
        }

        /// Outbound movements never change the average cost
        #[test]
        fn prop_outbound_preserves_average(
            stock in quantity_strategy(),
            price in price_strategy(),
            sold in quantity_strategy()
        ) {
            let movements = vec![
                movement(MovementType::Inbound, 1, vec![line("X", "Widget", stock, price)]),
                movement(MovementType::Outbound, 2, vec![line("X", "Widget", sold, price)]),
            ];

            let balance = compute_balance(&movements, &directory(), None);

            if stock > sold {
                prop_assert_eq!(balance.products.len(), 1);
                prop_assert_eq!(balance.products[0].avg_price, price);
                prop_assert_eq!(balance.products[0].quantity, stock - sold);
            } else {
                prop_assert!(balance.products.is_empty());
            }
        }
    }
}
