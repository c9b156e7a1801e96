use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::HeaderValue, Router};
use teamfolio_core::earnings::AccrualPolicy;
use teamfolio_core::members::{HttpMemberSource, MemberService, MemberServiceTrait};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api;
use crate::config::{Config, LogFormat};

pub struct AppState {
    pub member_service: Arc<dyn MemberServiceTrait>,
    pub accrual_policy: AccrualPolicy,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let source = HttpMemberSource::new(config.backend_url.clone(), config.request_timeout)
        .context("failed to build user data client")?;
    let member_service = MemberService::with_policy(Arc::new(source), config.accrual_policy);

    Ok(Arc::new(AppState {
        member_service: Arc::new(member_service),
        accrual_policy: config.accrual_policy,
    }))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .context("TEAMFOLIO_CORS_ORIGIN is not a valid header value")?,
            )
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    };

    // Leave headroom over the upstream timeout so its error surfaces first
    let request_timeout = config.request_timeout + Duration::from_secs(5);

    Ok(Router::new()
        .nest("/api/v1", api::router())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let state = build_state(&config)?;
    let app = app_router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(
        addr = %config.listen_addr,
        backend = %config.backend_url,
        policy = ?config.accrual_policy,
        "teamfolio server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
