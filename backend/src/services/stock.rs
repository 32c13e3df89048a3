//! Stock balance service
//!
//! Thin database front for the pure aggregation in `shared::balance`: loads
//! the movement history in replay order plus the company name map, then hands
//! both to `compute_balance`.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::movement::{MovementRow, MOVEMENT_COLUMNS};
use shared::balance::compute_balance;
use crate::models::{Movement, StockBalance};

/// Stock balance service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the current stock balance, optionally restricted to one company
    pub async fn get_balance(&self, company_id: Option<Uuid>) -> AppResult<StockBalance> {
        // Same-date movements replay in insertion order, so created_at breaks ties
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM movements WHERE 1=1",
            MOVEMENT_COLUMNS
        ));
        if let Some(company_id) = company_id {
            query.push(" AND company_id = ").push_bind(company_id);
        }
        query.push(" ORDER BY date ASC, created_at ASC");

        let rows = query
            .build_query_as::<MovementRow>()
            .fetch_all(&self.db)
            .await?;

        let movements = rows
            .into_iter()
            .map(Movement::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let companies: HashMap<Uuid, String> =
            sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM companies")
                .fetch_all(&self.db)
                .await?
                .into_iter()
                .collect();

        Ok(compute_balance(&movements, &companies, company_id))
    }
}
