//! NF-e invoice import handler

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::audit::client_ip;
use crate::services::nfe::{parse_nfe, NfeImport};
use crate::services::{AuditService, StorageService};
use crate::AppState;

/// Import an NF-e XML (multipart field `xmlfile`): extract the emitter,
/// invoice header and product lines, and keep the document on disk so the
/// resulting movement can reference it.
pub async fn import_nfe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> AppResult<Json<NfeImport>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation {
            field: "xmlfile".to_string(),
            message: format!("Invalid multipart payload: {}", e),
            message_pt: "Erro ao processar arquivo XML".to_string(),
        })?
    {
        if field.name() != Some("xmlfile") {
            continue;
        }

        let data = field.bytes().await.map_err(|e| AppError::Validation {
            field: "xmlfile".to_string(),
            message: format!("Failed to read upload: {}", e),
            message_pt: "Erro ao processar arquivo XML".to_string(),
        })?;

        let xml = String::from_utf8_lossy(&data);
        let mut import = parse_nfe(&xml)?;

        let storage = StorageService::new(&state.config);
        import.movement.xml_path = Some(storage.save_xml(&data).await?);

        AuditService::new(state.db)
            .record(
                "XML_UPLOAD",
                &format!(
                    "User '{}' imported NF-e {} ({} lines)",
                    user.username,
                    import.movement.nfe,
                    import.products.len()
                ),
                &client_ip(&headers),
            )
            .await;

        return Ok(Json(import));
    }

    Err(AppError::Validation {
        field: "xmlfile".to_string(),
        message: "XML file is required".to_string(),
        message_pt: "Nenhum arquivo XML foi enviado".to_string(),
    })
}
