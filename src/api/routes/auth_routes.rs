//! Auth Routes
//!
//! 定义认证相关的 API 路由及其门禁链。

use crate::api::handlers::auth_handler::*;
use crate::security::middleware::{auth_middleware, login_rate_limit_middleware};
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建认证路由器
///
/// 门禁顺序（先失败先返回）：
/// - `/verify-token`: 认证门禁 → 处理程序
/// - `/login`: 限流门禁 → 处理程序
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let verify = Router::new()
        .route("/verify-token", get(verify_token))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let login = Router::new().route("/login", post(login)).layer(
        middleware::from_fn_with_state(state, login_rate_limit_middleware),
    );

    verify.merge(login)
}
