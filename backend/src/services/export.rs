//! Data export service

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::company::CompanyService;
use crate::services::movement::MovementService;
use crate::models::{Company, Movement};
use shared::types::MovementFilter;

/// Export service producing full-database snapshots
#[derive(Clone)]
pub struct ExportService {
    db: PgPool,
}

/// A movement enriched with its company name for export
#[derive(Debug, Serialize)]
pub struct ExportMovement {
    #[serde(flatten)]
    pub movement: Movement,
    pub company_name: Option<String>,
}

/// Complete export payload
#[derive(Debug, Serialize)]
pub struct ExportData {
    pub export_date: DateTime<Utc>,
    pub companies: Vec<Company>,
    pub movements: Vec<ExportMovement>,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    id: Uuid,
    date: chrono::NaiveDate,
    #[serde(rename = "type")]
    movement_type: &'static str,
    company: String,
    nfe: String,
    product_count: usize,
    total_value: rust_decimal::Decimal,
}

impl ExportService {
    /// Create a new ExportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Export everything as a JSON-serializable snapshot
    pub async fn export_json(&self) -> AppResult<ExportData> {
        let (companies, movements) = self.load_all().await?;
        let names: HashMap<Uuid, String> = companies
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let movements = movements
            .into_iter()
            .map(|movement| ExportMovement {
                company_name: names.get(&movement.company_id).cloned(),
                movement,
            })
            .collect();

        Ok(ExportData {
            export_date: Utc::now(),
            companies,
            movements,
        })
    }

    /// Export the movement history as CSV
    pub async fn export_csv(&self) -> AppResult<String> {
        let (companies, movements) = self.load_all().await?;
        let names: HashMap<Uuid, String> = companies
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let mut writer = csv::Writer::from_writer(vec![]);
        for movement in movements {
            let row = CsvRow {
                id: movement.id,
                date: movement.date,
                movement_type: movement.movement_type.as_str(),
                company: names
                    .get(&movement.company_id)
                    .cloned()
                    .unwrap_or_default(),
                nfe: movement.nfe.unwrap_or_default(),
                product_count: movement.products.len(),
                total_value: movement.total_value,
            };
            writer
                .serialize(row)
                .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))
    }

    async fn load_all(&self) -> AppResult<(Vec<Company>, Vec<Movement>)> {
        let companies = CompanyService::new(self.db.clone()).list().await?;
        let movements = MovementService::new(self.db.clone())
            .list(&MovementFilter::default())
            .await?;
        Ok((companies, movements))
    }
}
