//! Rate Limiting Module
//!
//! Fixed-window request counter keyed by client identity. The window store
//! is explicitly owned and injected through `AppState`, never a module-level
//! singleton, so deployments and tests can swap it.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_seconds: 15 * 60,
        }
    }
}

/// Rate limit result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in the current window
        remaining: u32,
    },
    /// Request is rate limited
    Limited {
        /// Seconds until the window resets
        retry_after: u64,
    },
}

/// Client identifier for rate limiting
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum RateLimitClient {
    /// IP address based client
    Ip(String),
    /// Token subject based client
    Subject(String),
    /// Custom client ID
    Custom(String),
}

impl RateLimitClient {
    /// Create from IP address
    pub fn from_ip(ip: &str) -> Self {
        RateLimitClient::Ip(ip.to_string())
    }

    /// Create from token subject
    pub fn from_subject(subject: &str) -> Self {
        RateLimitClient::Subject(subject.to_string())
    }

    /// Get client identifier string
    pub fn as_str(&self) -> &str {
        match self {
            RateLimitClient::Ip(s) => s.as_str(),
            RateLimitClient::Subject(s) => s.as_str(),
            RateLimitClient::Custom(s) => s.as_str(),
        }
    }
}

/// A single client's counter window
#[derive(Debug, Clone)]
struct RateWindow {
    /// Window start time
    window_start: DateTime<Utc>,
    /// Requests counted in this window
    count: u32,
}

impl RateWindow {
    fn expired(&self, window: Duration, now: DateTime<Utc>) -> bool {
        now - self.window_start >= window
    }
}

// Expired windows are swept once the map grows past this, keeping memory
// bounded to active client keys without a background task.
const PURGE_THRESHOLD: usize = 1024;

/// In-memory fixed-window rate limiter.
///
/// Check-and-increment happens under a single write lock, so overlapping
/// requests from the same key cannot lose updates.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Rate limit configuration
    config: RateLimitConfig,
    /// Window store (client -> counter window)
    windows: Arc<RwLock<HashMap<String, RateWindow>>>,
    /// Whether rate limiting is enabled
    enabled: bool,
}

impl RateLimiter {
    /// Create new rate limiter
    pub fn new(config: RateLimitConfig, enabled: bool) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
            enabled,
        }
    }

    /// Create from security settings
    pub fn from_settings(max_requests: u32, window_seconds: u64, enabled: bool) -> Self {
        Self::new(
            RateLimitConfig {
                max_requests,
                window_seconds,
            },
            enabled,
        )
    }

    /// Limiter that allows everything, for tests and development
    pub fn disabled() -> Self {
        Self::new(RateLimitConfig::default(), false)
    }

    /// Check the rate limit for a client, counting this request if allowed.
    pub async fn check(&self, client: &RateLimitClient) -> RateLimitResult {
        if !self.enabled {
            return RateLimitResult::Allowed {
                remaining: self.config.max_requests,
            };
        }

        let now = Utc::now();
        let window = Duration::seconds(self.config.window_seconds as i64);
        let mut windows = self.windows.write().await;

        if windows.len() > PURGE_THRESHOLD {
            windows.retain(|_, w| !w.expired(window, now));
        }

        let entry = windows
            .entry(client.as_str().to_string())
            .or_insert(RateWindow {
                window_start: now,
                count: 0,
            });

        // Lazy reset: a read past the window duration starts a fresh window
        // before the check applies.
        if entry.expired(window, now) {
            entry.window_start = now;
            entry.count = 0;
        }

        if entry.count >= self.config.max_requests {
            let reset_at = entry.window_start + window;
            let retry_after = (reset_at - now).num_seconds().max(0) as u64;
            return RateLimitResult::Limited { retry_after };
        }

        entry.count += 1;
        RateLimitResult::Allowed {
            remaining: self.config.max_requests - entry.count,
        }
    }

    /// Clear rate limit data for a client (for testing/admin)
    pub async fn clear_client(&self, client: &RateLimitClient) {
        let mut windows = self.windows.write().await;
        windows.remove(client.as_str());
    }

    /// Clear all rate limit data (for testing)
    pub async fn clear_all(&self) {
        let mut windows = self.windows.write().await;
        windows.clear();
    }

    /// Number of live client windows
    pub async fn tracked_clients(&self) -> usize {
        self.windows.read().await.len()
    }
}

/// Async trait for rate limit stores (allows custom implementations)
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Check the rate limit, counting the request if allowed
    async fn check(&self, client: &RateLimitClient) -> RateLimitResult;
    /// Drop a client's window
    async fn clear(&self, client: &RateLimitClient);
}

#[async_trait]
impl RateLimitStore for RateLimiter {
    async fn check(&self, client: &RateLimitClient) -> RateLimitResult {
        RateLimiter::check(self, client).await
    }

    async fn clear(&self, client: &RateLimitClient) {
        self.clear_client(client).await
    }
}
