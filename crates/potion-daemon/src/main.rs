//! potion-daemon entry point.
//!
//! Thin: load config, set up tracing, build the shared state, wire
//! middleware and serve. Route handlers live in `routes.rs`.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use potion_config::{report_unused_keys, DashboardConfig, Surface, UnusedKeyPolicy};
use potion_daemon::{routes, state};
use potion_source::HttpAuditSource;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

/// Comma-separated config paths in merge order. Unset means defaults only.
const ENV_CONFIG_PATHS: &str = "POTION_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let paths = config_paths_from_env();
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let (loaded, cfg) = DashboardConfig::load(&path_refs)?;
    let report = report_unused_keys(Surface::Daemon, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    for p in &report.unused_leaf_pointers {
        warn!(pointer = %p, "config key not read by the daemon");
    }
    info!(config_hash = %loaded.config_hash, "config loaded");

    let source = HttpAuditSource::new(
        cfg.upstream.audit_base_url.clone(),
        cfg.upstream.info_base_url.clone(),
        cfg.timeout(),
    )?;
    let shared = Arc::new(state::AppState::new(Arc::new(source), cfg.timezone()?));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = cfg.daemon_addr()?;
    info!(
        audit = %cfg.upstream.audit_base_url,
        info = %cfg.upstream.info_base_url,
        "potion-daemon listening on http://{}",
        addr
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn config_paths_from_env() -> Vec<String> {
    std::env::var(ENV_CONFIG_PATHS)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// CORS: allow only localhost origins (dashboard dev servers).
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(tower_http::cors::Any)
}
