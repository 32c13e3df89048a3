//! Image upload handler

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::audit::client_ip;
use crate::services::{AuditService, StorageService};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: String,
    pub filename: String,
}

/// Upload a movement photo (multipart field `imagefile`)
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation {
            field: "imagefile".to_string(),
            message: format!("Invalid multipart payload: {}", e),
            message_pt: "Erro ao fazer upload da imagem".to_string(),
        })?
    {
        if field.name() != Some("imagefile") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| AppError::Validation {
            field: "imagefile".to_string(),
            message: format!("Failed to read upload: {}", e),
            message_pt: "Erro ao fazer upload da imagem".to_string(),
        })?;

        let storage = StorageService::new(&state.config);
        let path = storage.save_image(&content_type, &data).await?;

        AuditService::new(state.db)
            .record(
                "IMAGE_UPLOAD",
                &format!("User '{}' uploaded image {}", user.username, path),
                &client_ip(&headers),
            )
            .await;

        let filename = std::path::Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());

        return Ok(Json(UploadResponse { path, filename }));
    }

    Err(AppError::Validation {
        field: "imagefile".to_string(),
        message: "Image file is required".to_string(),
        message_pt: "Nenhuma imagem foi enviada".to_string(),
    })
}
