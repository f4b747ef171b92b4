//! 认证 DTO
//!
//! 定义登录与令牌校验相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};

/// 登录请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

/// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// 是否成功
    pub success: bool,
    /// 签发的 Bearer 令牌
    pub token: String,
    /// 令牌有效期（秒）
    pub expires_in: u64,
}
