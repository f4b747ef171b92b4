//! Data Routes
//!
//! 定义数据提交相关的 API 路由。

use crate::api::handlers::data_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建数据路由器
pub fn create_data_router() -> Router<AppState> {
    Router::new().route("/data", post(submit_data))
}
