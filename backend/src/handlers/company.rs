//! Company management handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::audit::client_ip;
use crate::services::company::SaveCompanyInput;
use crate::services::{AuditService, CompanyService};
use crate::AppState;
use crate::models::Company;

/// List all companies
pub async fn list_companies(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Company>>> {
    let companies = CompanyService::new(state.db).list().await?;
    Ok(Json(companies))
}

/// Get a single company
pub async fn get_company(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<Company>> {
    let company = CompanyService::new(state.db).get(company_id).await?;
    Ok(Json(company))
}

/// Create a new company
pub async fn create_company(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Json(input): Json<SaveCompanyInput>,
) -> AppResult<(StatusCode, Json<Company>)> {
    let company = CompanyService::new(state.db.clone()).create(input).await?;

    AuditService::new(state.db)
        .record(
            "COMPANY_CREATE",
            &format!("User '{}' created company '{}'", user.username, company.name),
            &client_ip(&headers),
        )
        .await;

    Ok((StatusCode::CREATED, Json(company)))
}

/// Update an existing company
pub async fn update_company(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Path(company_id): Path<Uuid>,
    Json(input): Json<SaveCompanyInput>,
) -> AppResult<Json<Company>> {
    let company = CompanyService::new(state.db.clone())
        .update(company_id, input)
        .await?;

    AuditService::new(state.db)
        .record(
            "COMPANY_UPDATE",
            &format!("User '{}' updated company '{}'", user.username, company.name),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(company))
}

/// Delete a company (refused while it still has movements)
pub async fn delete_company(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Path(company_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    CompanyService::new(state.db.clone()).delete(company_id).await?;

    AuditService::new(state.db)
        .record(
            "COMPANY_DELETE",
            &format!("User '{}' deleted company {}", user.username, company_id),
            &client_ip(&headers),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}
