//! Data export handler

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::audit::client_ip;
use crate::services::{AuditService, ExportService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Download a snapshot of the database as a JSON or CSV attachment
pub async fn export_data(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let service = ExportService::new(state.db.clone());
    let format = query.format.as_deref().unwrap_or("json");
    let stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");

    let response = if format == "csv" {
        let csv = service.export_csv().await?;
        (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"estoque_{}.csv\"", stamp),
                ),
            ],
            csv,
        )
            .into_response()
    } else {
        let data = service.export_json().await?;
        (
            [(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"estoque_{}.json\"", stamp),
            )],
            Json(data),
        )
            .into_response()
    };

    AuditService::new(state.db)
        .record(
            "DATA_EXPORT",
            &format!("User '{}' exported data as {}", user.username, format),
            &client_ip(&headers),
        )
        .await;

    Ok(response)
}
