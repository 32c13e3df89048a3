//! Stock balance handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::StockService;
use crate::AppState;
use crate::models::StockBalance;

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub company_id: Option<Uuid>,
}

/// Current stock balance, optionally restricted to one company
pub async fn get_stock_balance(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<BalanceQuery>,
) -> AppResult<Json<StockBalance>> {
    let balance = StockService::new(state.db)
        .get_balance(query.company_id)
        .await?;
    Ok(Json(balance))
}
