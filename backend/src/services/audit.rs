//! Audit log service
//!
//! Records who did what from where. Writes are best-effort: an audit failure
//! must never fail the request it describes.

use axum::http::HeaderMap;
use sqlx::PgPool;

/// Audit log service
#[derive(Clone)]
pub struct AuditService {
    db: PgPool,
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an action in the audit log
    pub async fn record(&self, action: &str, details: &str, ip: &str) {
        let result = sqlx::query("INSERT INTO audit_logs (action, details, ip_address) VALUES ($1, $2, $3)")
            .bind(action)
            .bind(details)
            .bind(ip)
            .execute(&self.db)
            .await;

        if let Err(e) = result {
            tracing::warn!("Failed to record audit log for {}: {}", action, e);
        }
    }
}

/// Client address for audit rows, taken from the forwarding header when the
/// service sits behind a proxy.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
