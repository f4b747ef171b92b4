//! 数据 DTO
//!
//! 定义数据提交相关的响应数据结构。

use serde::Serialize;

/// 数据提交响应
#[derive(Debug, Serialize)]
pub struct DataResponse {
    /// 是否成功
    pub success: bool,
}
