//! 用户 DTO
//!
//! 定义用户创建相关的响应数据结构。请求体直接反序列化为
//! `security::validation::UserInput`，由验证器统一裁决。

use serde::Serialize;

use crate::security::validation::ValidatedUser;

/// 创建用户响应
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    /// 是否成功
    pub success: bool,
    /// 通过验证的用户记录
    pub user: ValidatedUser,
}
