//! EDC Marchés360 server
//!
//! Loads configuration, opens the document store, creates the first
//! administrator when needed and serves the API until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edc_api::extractors::InstanceInfo;
use edc_api::AppState;
use edc_auth::JwtService;
use edc_core::config::{AppConfig, ServerConfig, StoreBackend, StoreConfig};
use edc_services::auth::bootstrap_admin;
use edc_services::{ServiceContext, ServiceSettings};
use edc_store::{MemoryStore, PgStore, PgStoreConfig, SharedStore};

mod health;

use health::{HealthChecker, HealthConfig};

const DEFAULT_CONFIG_PATH: &str = "config/marches360";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config_path = std::env::var("EDC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load(&config_path).context("loading configuration")?;
    config.validate().context("validating configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        store = ?config.store.backend,
        "starting EDC Marchés360"
    );

    let store = open_store(&config.store).await?;
    let services = ServiceContext::new(
        store.clone(),
        ServiceSettings {
            password_min_length: config.auth.password_min_length,
            audit_window: config.audit.window,
        },
    );

    if let Some(admin) = &config.auth.bootstrap_admin {
        if bootstrap_admin(&services, admin).await?.is_none() {
            info!("super administrator already present, bootstrap skipped");
        }
    }

    let jwt = JwtService::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl_seconds);
    let info = InstanceInfo {
        app_title: config.instance.app_title.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let api_state = AppState::new(services, jwt, info);
    let checker = Arc::new(HealthChecker::new(HealthConfig::default(), store));

    let app = build_router(api_state, checker, &config.server);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

/// Text output by default, JSON lines with `EDC_LOG_FORMAT=json`
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,edc_server=debug,edc_api=debug,tower_http=debug".into());

    let json = std::env::var("EDC_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let (json_layer, text_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            ),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn open_store(config: &StoreConfig) -> anyhow::Result<SharedStore> {
    let store: SharedStore = match config.backend {
        StoreBackend::Memory => match &config.snapshot_path {
            Some(path) => Arc::new(
                MemoryStore::open(path)
                    .await
                    .with_context(|| format!("opening snapshot {}", path))?,
            ),
            None => {
                tracing::warn!("memory store without snapshot, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        },
        StoreBackend::Postgres => {
            let pg = PgStoreConfig::with_url(&config.database_url).max_connections(config.pool_size);
            Arc::new(PgStore::connect(&pg).await.context("connecting to postgres")?)
        }
    };
    info!(backend = store.backend(), "document store ready");
    Ok(store)
}

fn build_router(api_state: AppState, checker: Arc<HealthChecker>, server: &ServerConfig) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::readiness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(checker);

    Router::new()
        .merge(health_routes)
        .merge(edc_api::router().with_state(api_state))
        .layer(DefaultBodyLimit::max(server.max_body_size_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_seconds)))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = AppConfig::default();
        let store: SharedStore = Arc::new(MemoryStore::new());
        let services = ServiceContext::new(store.clone(), ServiceSettings::default());
        let jwt = JwtService::new(b"server-test-secret-0123456789", 3600);
        let state = AppState::new(services, jwt, InstanceInfo::default());
        let checker = Arc::new(HealthChecker::new(HealthConfig::default(), store));
        build_router(state, checker, &config.server)
    }

    async fn get_status(uri: &str) -> StatusCode {
        test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        assert_eq!(get_status("/health").await, StatusCode::OK);
        assert_eq!(get_status("/health/live").await, StatusCode::OK);
        assert_eq!(get_status("/health/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_is_mounted() {
        assert_eq!(get_status("/api/v1").await, StatusCode::OK);
        assert_eq!(get_status("/api/v1/projects").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get_status("/nowhere").await, StatusCode::NOT_FOUND);
    }
}
