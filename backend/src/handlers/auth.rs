//! Authentication handlers

use axum::{extract::State, http::HeaderMap, Json};

use crate::error::AppResult;
use crate::services::audit::client_ip;
use crate::services::auth::{LoginInput, LoginResponse};
use crate::services::{AuditService, AuthService};
use crate::AppState;

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let username = input.username.clone();
    let service = AuthService::new(state.db.clone(), &state.config);
    let result = service.login(input).await;

    let audit = AuditService::new(state.db);
    let ip = client_ip(&headers);
    match &result {
        Ok(_) => {
            audit
                .record("LOGIN", &format!("User '{}' logged in", username), &ip)
                .await
        }
        Err(_) => {
            audit
                .record(
                    "LOGIN_FAILED",
                    &format!("Failed login attempt for '{}'", username),
                    &ip,
                )
                .await
        }
    }

    result.map(Json)
}
