use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout: 30,
            max_request_size: 1024 * 1024,
        }
    }
}

/// 安全配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// JWT 签名密钥（为空时启动阶段生成随机密钥）
    pub jwt_secret: String,
    /// 会话 Cookie 签名密钥（为空时启动阶段生成随机密钥）
    pub session_secret: String,
    /// 文件下载根目录
    pub downloads_dir: PathBuf,
    /// 登录限流：窗口内最大请求数
    pub login_max_requests: u32,
    /// 登录限流：窗口时长（秒）
    pub login_window_seconds: u64,
    /// bcrypt 工作因子
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_secret: String::new(),
            downloads_dir: PathBuf::from("downloads"),
            login_max_requests: 5,
            login_window_seconds: 15 * 60,
            bcrypt_cost: 12,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 运行环境: "development"、"production" 或 "test"
    pub environment: String,
    /// 服务器配置
    pub server: ServerConfig,
    /// 安全配置
    pub security: SecurityConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 测试环境下不监听网络端口
    pub fn is_test(&self) -> bool {
        self.environment.eq_ignore_ascii_case("test")
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
