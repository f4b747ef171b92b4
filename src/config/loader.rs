use crate::config::config::AppConfig;
use crate::security::credentials;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use std::path::PathBuf;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 搜索路径：
    /// 1. ./config.toml
    /// 2. GATEHOUSE_ 前缀环境变量
    /// 3. 约定环境变量（JWT_SECRET、SESSION_SECRET、PORT、APP_ENV）
    pub fn load() -> Result<AppConfig, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("GATEHOUSE_").split("_").global());

        let mut config: AppConfig = figment.extract()?;
        apply_well_known_env(&mut config);
        fill_generated_secrets(&mut config);
        Ok(config)
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("GATEHOUSE_").split("_").global());

        let mut config: AppConfig = figment.extract()?;
        apply_well_known_env(&mut config);
        fill_generated_secrets(&mut config);
        Ok(config)
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.security.downloads_dir.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingDownloadsDir);
        }

        if config.security.login_window_seconds == 0 || config.security.login_max_requests == 0 {
            return Err(ConfigValidationError::InvalidRateWindow);
        }

        // bcrypt 合法工作因子范围
        if !(4..=31).contains(&config.security.bcrypt_cost) {
            return Err(ConfigValidationError::InvalidBcryptCost(
                config.security.bcrypt_cost,
            ));
        }

        Ok(())
    }
}

/// 应用约定的非前缀环境变量
fn apply_well_known_env(config: &mut AppConfig) {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        if !secret.is_empty() {
            config.security.jwt_secret = secret;
        }
    }

    if let Ok(secret) = std::env::var("SESSION_SECRET") {
        if !secret.is_empty() {
            config.security.session_secret = secret;
        }
    }

    if let Ok(port) = std::env::var("PORT") {
        if let Ok(port) = port.parse::<u16>() {
            config.server.port = port;
        }
    }

    if let Ok(env) = std::env::var("APP_ENV") {
        if !env.is_empty() {
            config.environment = env;
        }
    }
}

/// 未配置的密钥以随机值填充，绝不退回硬编码字面量
fn fill_generated_secrets(config: &mut AppConfig) {
    if config.security.jwt_secret.is_empty() {
        config.security.jwt_secret = credentials::generate_secret();
        tracing::warn!("JWT_SECRET not configured, generated an ephemeral random secret");
    }

    if config.security.session_secret.is_empty() {
        config.security.session_secret = credentials::generate_secret();
        tracing::warn!("SESSION_SECRET not configured, generated an ephemeral random secret");
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("文件下载根目录未配置")]
    MissingDownloadsDir,

    #[error("限流窗口参数无效，窗口时长与请求数必须大于 0")]
    InvalidRateWindow,

    #[error("bcrypt 工作因子无效: {0}（合法范围 4..=31）")]
    InvalidBcryptCost(u32),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}
