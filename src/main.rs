use gatehouse::api::{self, app_state::AppState};
use gatehouse::config::loader::ConfigLoader;
use gatehouse::observability::{ObservabilityState, create_observability_router, init_tracing};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("gatehouse");

    info!("Starting Gatehouse...");

    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let app_state = AppState::from_config(&config)?;
    info!("Application state created");

    // 创建可观测性状态并集成路由
    let observability_state = Arc::new(ObservabilityState::new("0.1.0".to_string()));
    let metrics_state = observability_state.clone();
    let api_router = api::create_router(app_state).layer(axum::middleware::from_fn(
        move |req: axum::extract::Request, next: axum::middleware::Next| {
            let state = metrics_state.clone();
            async move { gatehouse::observability::metrics_middleware(req, next, state).await }
        },
    ));
    let router = create_observability_router(observability_state)
        .merge(api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http());
    info!("API router created with observability endpoints");

    // 测试环境下只构建，不监听
    if config.is_test() {
        info!("Test environment detected, skipping network listener");
        return Ok(());
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
