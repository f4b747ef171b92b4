//! 可观测性模块
//!
//! 提供结构化日志、请求计数和健康检查。

use axum::{Json, Router, response::IntoResponse, routing::get};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ===== Simple Metrics (using atomics for zero-dep implementation) =====

/// 简单应用指标
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub auth_rejections_total: Arc<AtomicU64>,
    pub rate_limited_total: Arc<AtomicU64>,
    pub validation_rejections_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录认证拒绝
    pub fn record_auth_rejection(&self) {
        self.auth_rejections_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录限流拒绝
    pub fn record_rate_limited(&self) {
        self.rate_limited_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录验证拒绝（含路径拒绝，均为 400）
    pub fn record_validation_rejection(&self) {
        self.validation_rejections_total
            .fetch_add(1, Ordering::SeqCst);
    }

    /// 汇总计数快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            http_requests_total: self.http_requests_total.load(Ordering::SeqCst),
            auth_rejections_total: self.auth_rejections_total.load(Ordering::SeqCst),
            rate_limited_total: self.rate_limited_total.load(Ordering::SeqCst),
            validation_rejections_total: self.validation_rejections_total.load(Ordering::SeqCst),
        }
    }
}

/// 指标快照
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub http_requests_total: u64,
    pub auth_rejections_total: u64,
    pub rate_limited_total: u64,
    pub validation_rejections_total: u64,
}

// ===== Health Check =====

/// 健康检查状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
}

/// 应用状态（用于健康检查）
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(version: String) -> Self {
        Self {
            metrics: Arc::new(AppMetrics::default()),
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

// ===== Health Check Handlers =====

/// 获取健康状态
pub async fn health_check(
    state: axum::extract::State<Arc<ObservabilityState>>,
) -> impl IntoResponse {
    let health_status = HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    };

    (axum::http::StatusCode::OK, Json(health_status))
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 指标端点
pub async fn metrics(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/metrics", get(metrics))
        .with_state(state)
}

// ===== Request Metrics Middleware =====

/// 记录请求计数与拒绝分类的中间件
pub async fn metrics_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
    state: Arc<ObservabilityState>,
) -> axum::response::Response {
    state.metrics.record_http_request();

    let response = next.run(req).await;

    match response.status().as_u16() {
        401 => state.metrics.record_auth_rejection(),
        429 => state.metrics.record_rate_limited(),
        400 => state.metrics.record_validation_rejection(),
        _ => {}
    }

    response
}

// ===== Structured Logging =====

/// 初始化结构化日志
pub fn init_tracing(service_name: &str) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| format!("info,{}", service_name));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}
