//! API 模块
//!
//! 提供 REST API 支持。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::error::AppError;
use crate::security::middleware::security_headers_middleware;
use axum::Router;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth_routes::create_auth_router(app_state.clone()))
        .merge(routes::download_routes::create_download_router())
        .merge(routes::data_routes::create_data_router())
        .merge(routes::user_routes::create_user_router());

    Router::new()
        .merge(api)
        // Add security headers middleware to all routes
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(app_state)
}

pub async fn initialize_api(app_state: AppState) -> Result<Router, AppError> {
    tracing::info!("Initializing API router...");
    Ok(create_router(app_state))
}
