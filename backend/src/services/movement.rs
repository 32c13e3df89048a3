//! Stock movement service
//!
//! Movements are the source records the stock balance is replayed from, so
//! writes normalize product lines up front: incomplete lines are dropped and
//! line totals are recomputed before anything reaches the database.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Movement, MovementType, ProductLine};
use shared::types::MovementFilter;

/// Movement service
#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

/// Input for creating or updating a movement
#[derive(Debug, Deserialize)]
pub struct SaveMovementInput {
    pub company_id: Uuid,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub date: NaiveDate,
    pub nfe: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductLine>,
    pub image_path: Option<String>,
    pub xml_path: Option<String>,
    pub notes: Option<String>,
}

/// File attachments released when a movement is deleted
#[derive(Debug)]
pub struct MovementFiles {
    pub image_path: Option<String>,
    pub xml_path: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MovementRow {
    pub id: Uuid,
    pub company_id: Uuid,
    #[sqlx(rename = "type")]
    pub movement_type: String,
    pub date: NaiveDate,
    pub nfe: Option<String>,
    pub products: sqlx::types::Json<Vec<ProductLine>>,
    pub total_value: Decimal,
    pub image_path: Option<String>,
    pub xml_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for Movement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let movement_type = MovementType::from_str(&row.movement_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown movement type in storage: {}", row.movement_type))
        })?;

        Ok(Movement {
            id: row.id,
            company_id: row.company_id,
            movement_type,
            date: row.date,
            nfe: row.nfe,
            products: row.products.0,
            total_value: row.total_value,
            image_path: row.image_path,
            xml_path: row.xml_path,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

pub(crate) const MOVEMENT_COLUMNS: &str =
    "id, company_id, type, date, nfe, products, total_value, image_path, xml_path, notes, created_at";

impl MovementService {
    /// Create a new MovementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List movements matching the filter, newest first
    pub async fn list(&self, filter: &MovementFilter) -> AppResult<Vec<Movement>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM movements WHERE 1=1",
            MOVEMENT_COLUMNS
        ));

        if let Some(company_id) = filter.company_id {
            query.push(" AND company_id = ").push_bind(company_id);
        }
        if let Some(movement_type) = filter.movement_type {
            query.push(" AND type = ").push_bind(movement_type.as_str());
        }
        if let Some(start_date) = filter.start_date {
            query.push(" AND date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            query.push(" AND date <= ").push_bind(end_date);
        }
        if let Some(min_value) = filter.min_value {
            query.push(" AND total_value >= ").push_bind(min_value);
        }
        if let Some(max_value) = filter.max_value {
            query.push(" AND total_value <= ").push_bind(max_value);
        }
        if let Some(product) = filter.product.as_deref().filter(|p| !p.trim().is_empty()) {
            query
                .push(" AND products::text ILIKE ")
                .push_bind(format!("%{}%", product.trim()));
        }

        query.push(" ORDER BY date DESC, created_at DESC");

        let rows = query
            .build_query_as::<MovementRow>()
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Movement::try_from).collect()
    }

    /// Get a movement by id
    pub async fn get(&self, movement_id: Uuid) -> AppResult<Movement> {
        let row = sqlx::query_as::<_, MovementRow>(&format!(
            "SELECT {} FROM movements WHERE id = $1",
            MOVEMENT_COLUMNS
        ))
        .bind(movement_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

        row.try_into()
    }

    /// Create a new movement
    pub async fn create(&self, input: SaveMovementInput) -> AppResult<Movement> {
        let products = self.validate_input(&input).await?;
        let total_value = Movement::compute_total(&products);

        let row = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            INSERT INTO movements (company_id, type, date, nfe, products, total_value, image_path, xml_path, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(input.company_id)
        .bind(input.movement_type.as_str())
        .bind(input.date)
        .bind(&input.nfe)
        .bind(sqlx::types::Json(&products))
        .bind(total_value)
        .bind(&input.image_path)
        .bind(&input.xml_path)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// Update an existing movement
    pub async fn update(&self, movement_id: Uuid, input: SaveMovementInput) -> AppResult<Movement> {
        let products = self.validate_input(&input).await?;
        let total_value = Movement::compute_total(&products);

        let row = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            UPDATE movements
            SET company_id = $1, type = $2, date = $3, nfe = $4, products = $5,
                total_value = $6, image_path = $7, xml_path = $8, notes = $9
            WHERE id = $10
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(input.company_id)
        .bind(input.movement_type.as_str())
        .bind(input.date)
        .bind(&input.nfe)
        .bind(sqlx::types::Json(&products))
        .bind(total_value)
        .bind(&input.image_path)
        .bind(&input.xml_path)
        .bind(&input.notes)
        .bind(movement_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

        row.try_into()
    }

    /// Delete a movement and return its file attachments so the caller can
    /// release them from storage.
    pub async fn delete(&self, movement_id: Uuid) -> AppResult<MovementFiles> {
        let row = sqlx::query_as::<_, (Option<String>, Option<String>)>(
            "SELECT image_path, xml_path FROM movements WHERE id = $1",
        )
        .bind(movement_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

        sqlx::query("DELETE FROM movements WHERE id = $1")
            .bind(movement_id)
            .execute(&self.db)
            .await?;

        Ok(MovementFiles {
            image_path: row.0,
            xml_path: row.1,
        })
    }

    /// Validate the save input and return the sanitized product lines
    async fn validate_input(&self, input: &SaveMovementInput) -> AppResult<Vec<ProductLine>> {
        let company_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies WHERE id = $1")
                .bind(input.company_id)
                .fetch_one(&self.db)
                .await?;

        if company_exists == 0 {
            return Err(AppError::Validation {
                field: "company_id".to_string(),
                message: "Company does not exist".to_string(),
                message_pt: "Empresa é obrigatória".to_string(),
            });
        }

        let products = Movement::sanitize_lines(input.products.clone());
        if products.is_empty() {
            return Err(AppError::Validation {
                field: "products".to_string(),
                message: "At least one complete product line is required".to_string(),
                message_pt: "Pelo menos um produto deve ser informado".to_string(),
            });
        }

        Ok(products)
    }
}
