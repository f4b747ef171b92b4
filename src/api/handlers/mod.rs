//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod auth_handler;
pub mod data_handler;
pub mod download_handler;
pub mod user_handler;

pub use auth_handler::*;
pub use data_handler::*;
pub use download_handler::*;
pub use user_handler::*;
