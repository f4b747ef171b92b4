//! Security Configuration
//!
//! Security-related configuration settings.

use serde::{Deserialize, Serialize};

use crate::config::config::SecurityConfig;

/// Extended security configuration for the security layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// JWT secret key for token validation
    pub jwt_secret: String,
    /// JWT expiry time in seconds
    pub jwt_expiry_seconds: u64,
    /// Login rate limit: max requests per window
    pub login_max_requests: u32,
    /// Login rate limit: window duration in seconds
    pub login_window_seconds: u64,
    /// Enable rate limiting
    pub rate_limit_enabled: bool,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
    /// Enable security headers
    pub security_headers_enabled: bool,
    /// Session cookie contract for the external session collaborator
    pub cookie: CookiePolicy,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiry_seconds: 3600,
            login_max_requests: 5,
            login_window_seconds: 15 * 60,
            rate_limit_enabled: true,
            bcrypt_cost: crate::security::credentials::DEFAULT_BCRYPT_COST,
            security_headers_enabled: true,
            cookie: CookiePolicy::strict("session-id"),
        }
    }
}

impl SecuritySettings {
    /// Create development security settings
    pub fn development() -> Self {
        Self {
            jwt_secret: "dev-secret-change-in-production-min-32-chars".to_string(),
            rate_limit_enabled: false,
            ..Default::default()
        }
    }

    /// Create production security settings
    pub fn production() -> Self {
        Self::default()
    }

    /// Build settings from the loaded application config
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            login_max_requests: config.login_max_requests,
            login_window_seconds: config.login_window_seconds,
            bcrypt_cost: config.bcrypt_cost,
            ..Default::default()
        }
    }

    /// Check if a JWT secret is set (indicates production-like environment)
    pub fn has_jwt_secret(&self) -> bool {
        !self.jwt_secret.is_empty()
    }
}

/// Session cookie contract.
///
/// This is a configuration object handed to the external session-management
/// collaborator; sessions themselves are not implemented here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookiePolicy {
    /// Cookie name
    pub name: String,
    /// Only send over TLS
    pub secure: bool,
    /// Not readable from script
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
    /// Bounded lifetime in seconds
    pub max_age_seconds: u64,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::strict("session-id")
    }
}

impl CookiePolicy {
    /// Hardened policy: secure, http-only, same-site strict, 24h lifetime.
    pub fn strict(name: &str) -> Self {
        Self {
            name: name.to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            max_age_seconds: 24 * 60 * 60,
        }
    }
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Sent only for same-site requests
    Strict,
    /// Sent for top-level cross-site navigation
    Lax,
}
