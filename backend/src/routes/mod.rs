//! API route definitions

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::middleware::auth_middleware;
use crate::AppState;

/// All API v1 routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/auth", auth_routes())
        .nest("/companies", company_routes(&state))
        .nest("/movements", movement_routes(&state))
        .nest("/stock", stock_routes(&state))
        .nest("/uploads", upload_routes(&state))
        .nest("/nfe", nfe_routes(&state))
        .nest("/export", export_routes(&state))
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(handlers::login))
}

fn company_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route(
            "/:company_id",
            get(handlers::get_company)
                .put(handlers::update_company)
                .delete(handlers::delete_company),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

fn movement_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_movements).post(handlers::create_movement),
        )
        .route(
            "/:movement_id",
            get(handlers::get_movement)
                .put(handlers::update_movement)
                .delete(handlers::delete_movement),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

fn stock_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/balance", get(handlers::get_stock_balance))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

fn upload_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/image", post(handlers::upload_image))
        // The HTTP body limit sits well above the configured image cap; the
        // storage service enforces the precise limit and its error message
        .layer(DefaultBodyLimit::max(
            state.config.storage.max_image_bytes * 2,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

fn nfe_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/import", post(handlers::import_nfe))
        .layer(DefaultBodyLimit::max(
            state.config.storage.max_image_bytes * 2,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

fn export_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::export_data))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}
