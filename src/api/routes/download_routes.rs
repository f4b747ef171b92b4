//! Download Routes
//!
//! 定义文件下载相关的 API 路由。

use crate::api::handlers::download_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建下载路由器
pub fn create_download_router() -> Router<AppState> {
    Router::new().route("/download/:file", get(download))
}
