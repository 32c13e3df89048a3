//! Company management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Company;
use shared::validation::{
    normalize_cnpj, validate_brazilian_phone, validate_cnpj, validate_email,
};

/// Company service for registration data and the referential invariant
/// against movements
#[derive(Clone)]
pub struct CompanyService {
    db: PgPool,
}

/// Input for creating or updating a company
#[derive(Debug, Deserialize)]
pub struct SaveCompanyInput {
    pub name: String,
    pub cnpj: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    cnpj: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            name: row.name,
            cnpj: row.cnpj,
            phone: row.phone,
            email: row.email,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

const COMPANY_COLUMNS: &str = "id, name, cnpj, phone, email, address, created_at";

impl CompanyService {
    /// Create a new CompanyService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all companies, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies ORDER BY name ASC",
            COMPANY_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    /// Get a company by id
    pub async fn get(&self, company_id: Uuid) -> AppResult<Company> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Company".to_string()))?;

        Ok(row.into())
    }

    /// Create a new company
    pub async fn create(&self, input: SaveCompanyInput) -> AppResult<Company> {
        let cnpj = self.validate_input(&input, None).await?;

        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            INSERT INTO companies (name, cnpj, phone, email, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(&input.name)
        .bind(&cnpj)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update an existing company
    pub async fn update(&self, company_id: Uuid, input: SaveCompanyInput) -> AppResult<Company> {
        let cnpj = self.validate_input(&input, Some(company_id)).await?;

        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            r#"
            UPDATE companies
            SET name = $1, cnpj = $2, phone = $3, email = $4, address = $5
            WHERE id = $6
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(&input.name)
        .bind(&cnpj)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(company_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Company".to_string()))?;

        Ok(row.into())
    }

    /// Delete a company. Refused while any movement still references it.
    pub async fn delete(&self, company_id: Uuid) -> AppResult<()> {
        let movement_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM movements WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_one(&self.db)
        .await?;

        if movement_count > 0 {
            return Err(AppError::Conflict {
                resource: "company".to_string(),
                message: "Cannot delete a company with movements. Delete the movements first."
                    .to_string(),
                message_pt:
                    "Não é possível excluir empresa com movimentações. Exclua as movimentações primeiro."
                        .to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(company_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Company".to_string()));
        }

        Ok(())
    }

    /// Validate the save input and return the normalized CNPJ, checking
    /// uniqueness against other companies.
    async fn validate_input(
        &self,
        input: &SaveCompanyInput,
        exclude_id: Option<Uuid>,
    ) -> AppResult<Option<String>> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Company name is required".to_string(),
                message_pt: "Nome da empresa é obrigatório".to_string(),
            });
        }

        if let Some(email) = input.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validate_email(email).map_err(|message| AppError::Validation {
                field: "email".to_string(),
                message: message.to_string(),
                message_pt: "E-mail inválido".to_string(),
            })?;
        }

        if let Some(phone) = input.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            validate_brazilian_phone(phone).map_err(|message| AppError::Validation {
                field: "phone".to_string(),
                message: message.to_string(),
                message_pt: "Telefone inválido".to_string(),
            })?;
        }

        let cnpj = match input.cnpj.as_deref().filter(|c| !c.trim().is_empty()) {
            None => return Ok(None),
            Some(raw) => {
                validate_cnpj(raw).map_err(|message| AppError::Validation {
                    field: "cnpj".to_string(),
                    message: message.to_string(),
                    message_pt: "CNPJ inválido: deve ter 14 dígitos".to_string(),
                })?;
                normalize_cnpj(raw)
            }
        };

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM companies WHERE cnpj = $1 AND id != $2",
        )
        .bind(&cnpj)
        .bind(exclude_id.unwrap_or(Uuid::nil()))
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("cnpj".to_string()));
        }

        Ok(Some(cnpj))
    }
}
