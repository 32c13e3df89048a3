//! Upload storage for movement photos and invoice XMLs
//!
//! Files land under the configured upload directory with generated names, so
//! nothing from the client ever becomes a filesystem path.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// File storage service
#[derive(Clone)]
pub struct StorageService {
    upload_dir: PathBuf,
    max_image_bytes: usize,
}

impl StorageService {
    /// Create a new StorageService instance
    pub fn new(config: &Config) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.storage.upload_dir),
            max_image_bytes: config.storage.max_image_bytes,
        }
    }

    /// Store an uploaded image, validating its content type and size.
    /// Returns the stored path.
    pub async fn save_image(&self, content_type: &str, data: &[u8]) -> AppResult<String> {
        let extension = ALLOWED_IMAGE_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| AppError::Validation {
                field: "imagefile".to_string(),
                message: "Unsupported file type. Use JPG, PNG, GIF or WebP".to_string(),
                message_pt: "Tipo de arquivo não permitido. Use apenas JPG, PNG, GIF ou WebP"
                    .to_string(),
            })?;

        if data.len() > self.max_image_bytes {
            let limit_mb = self.max_image_bytes / (1024 * 1024);
            return Err(AppError::Validation {
                field: "imagefile".to_string(),
                message: format!("File too large. Maximum size: {}MB", limit_mb),
                message_pt: format!("Arquivo muito grande. Tamanho máximo: {}MB", limit_mb),
            });
        }

        let file_name = format!("img_{}.{}", Uuid::new_v4().simple(), extension);
        self.write(&file_name, data).await
    }

    /// Store an imported invoice XML. Returns the stored path.
    pub async fn save_xml(&self, data: &[u8]) -> AppResult<String> {
        let file_name = format!("xml_{}.xml", Uuid::new_v4().simple());
        self.write(&file_name, data).await
    }

    /// Best-effort removal of a previously stored file. Failures are logged,
    /// never surfaced: the owning record is already gone.
    pub async fn remove(&self, stored_path: &str) {
        let path = Path::new(stored_path);
        if !path.starts_with(&self.upload_dir) {
            tracing::warn!("Refusing to remove file outside upload dir: {}", stored_path);
            return;
        }
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!("Failed to remove stored file {}: {}", stored_path, e);
        }
    }

    async fn write(&self, file_name: &str, data: &[u8]) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::StorageError(format!("Cannot create upload dir: {}", e)))?;

        let path = self.upload_dir.join(file_name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::StorageError(format!("Cannot write upload: {}", e)))?;

        Ok(path.to_string_lossy().into_owned())
    }
}
