//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 认证错误（对客户端保持不透明）
    #[error("Invalid token")]
    AuthRejected,

    /// 速率限制
    #[error("Too many requests, retry after {retry_after} seconds")]
    RateLimited {
        /// 重试等待时间（秒）
        retry_after: u64,
    },

    /// 路径越界或资源不存在
    #[error("Invalid file path")]
    PathRejected,

    /// 字段验证错误
    #[error("Validation failed: {0}")]
    ValidationRejected(String),

    /// 请求体无法解析
    #[error("Malformed request payload")]
    MalformedInput,

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 内部错误
    #[error("Internal server error")]
    InternalFailure(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::InternalFailure(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(_: serde_json::Error) -> Self {
        AppError::MalformedInput
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::InternalFailure(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = (&self).into();

        // 内部细节只进日志，不进响应
        if let AppError::InternalFailure(detail) = &self {
            tracing::error!(detail = %detail, "request failed with internal error");
        }

        let body = Json(ErrorResponse::new(&code, &self.to_string()));
        let mut response = (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response();

        if let AppError::RateLimited { retry_after } = &self {
            if let Ok(value) = retry_after.to_string().parse() {
                response
                    .headers_mut()
                    .insert(axum::http::header::RETRY_AFTER, value);
            }
        }

        response
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    pub details: Option<String>,
    /// 请求 ID
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    /// 添加详细信息
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }

    /// 添加请求 ID
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::AuthRejected => (401, "UNAUTHORIZED".to_string()),
            AppError::RateLimited { .. } => (429, "RATE_LIMITED".to_string()),
            AppError::PathRejected => (400, "BAD_REQUEST".to_string()),
            AppError::ValidationRejected(_) => (400, "BAD_REQUEST".to_string()),
            AppError::MalformedInput => (400, "BAD_REQUEST".to_string()),
            _ => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
