//! sd-daemon entry point.
//!
//! Thin on purpose: sets up tracing, loads config and secrets, builds the
//! shared state, wires middleware and starts the HTTP server. Route handlers
//! live in `routes.rs`; shared state types live in `state.rs`.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use chrono::Utc;
use sd_ai::{Assistant, GeminiSettings};
use sd_config::{load_layered_yaml, report_unused_keys, resolve_secrets, AppConfig};
use sd_daemon::{routes, state};
use sd_store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let (config, config_hash) = load_config()?;
    let secrets = resolve_secrets(&config);
    if !secrets.has_ai_key() {
        warn!(
            env_var = %secrets.ai_api_key_var,
            "assistant api key not set; AI features will return fallbacks"
        );
    }

    let assistant = Assistant::gemini(
        secrets.ai_api_key.clone(),
        GeminiSettings {
            base_url: config.ai.base_url.clone(),
            model: config.ai.model.clone(),
            language: config.ai.language.clone(),
        },
    );

    let shared = Arc::new(state::AppState::from_parts(
        Store::seeded(Utc::now()),
        &config,
        assistant,
        config_hash,
    ));

    state::spawn_heartbeat(shared.bus.clone(), Duration::from_secs(1));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = bind_addr_from_env().unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8787)));
    info!(tz = %config.calendar.timezone, "sd-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
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

/// `SD_CONFIG` is a comma-separated list of YAML layers, base first.
/// Unset means built-in defaults.
fn load_config() -> anyhow::Result<(AppConfig, Option<String>)> {
    let Ok(raw) = std::env::var("SD_CONFIG") else {
        return Ok((AppConfig::default(), None));
    };
    let paths: Vec<&str> = raw.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
    if paths.is_empty() {
        return Ok((AppConfig::default(), None));
    }

    let loaded = load_layered_yaml(&paths).context("load SD_CONFIG")?;
    let report = report_unused_keys(&loaded.config_json);
    if !report.is_clean() {
        warn!(unused = ?report.unused_leaf_pointers, "config has keys nothing reads");
    }
    let config = loaded.app_config()?;
    info!(config_hash = %loaded.config_hash, layers = paths.len(), "config loaded");
    Ok((config, Some(loaded.config_hash)))
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var("SD_DAEMON_ADDR").ok()?.parse().ok()
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

/// CORS: allow only localhost origins.
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
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(tower_http::cors::Any)
}
