//! Portfolio site - REST API for the site's content and the data-access
//! client the front-end and admin tools use to talk to it.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use config::AppConfig;
use db::{seed, MemoryStore, PgStore, SharedStore};
use error::StartupError;
use routes::{AppState, ErrorResponse};

/// Configure CORS for the given origins. Unparseable origins are skipped.
pub fn configure_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Content-Security-Policy limiting the site to itself and the allowed origins.
fn content_security_policy(origins: &[String]) -> HeaderValue {
    let sources = std::iter::once("'self'".to_string())
        .chain(origins.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    let policy = format!(
        "default-src {sources}; img-src {sources} data: blob:; script-src {sources}; \
         style-src {sources} 'unsafe-inline'"
    );
    HeaderValue::from_str(&policy).unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"))
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    routes::error_reply(StatusCode::NOT_FOUND, "Not Found")
}

/// Create and configure the application router.
pub fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    let api = routes::api_router()
        .route_layer(middleware::from_fn(logging::middleware::log_request))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .fallback(not_found)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            content_security_policy(allowed_origins),
        ))
        .layer(CompressionLayer::new())
        // Global 2 MB request body cap
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(configure_cors(allowed_origins))
}

/// Pick the store: PostgreSQL when configured, otherwise the seeded memory store.
pub async fn build_store(config: &AppConfig) -> Result<SharedStore, StartupError> {
    match &config.database {
        Some(db_config) => {
            let store = PgStore::connect(Some(db_config.clone())).await?;
            store.run_migrations().await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("DATABASE_URL not set. Running on the in-memory store.");
            let store = MemoryStore::new();
            seed::seed_demo(
                &store,
                &config.admin_email,
                &config.admin_password,
                config.bcrypt_cost,
            )
            .await?;
            Ok(Arc::new(store))
        }
    }
}

/// Run the server (used by main).
pub async fn run() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();

    // Guards must live until the server exits or buffered log lines are lost.
    let _log_guards = logging::init(&logging::config::LogConfig::from_env());

    routes::health::init_start_time();

    let config = AppConfig::from_env();
    config.validate()?;

    let store = build_store(&config).await?;
    let state = AppState::new(store, &config.jwt_secret, config.bcrypt_cost);
    let app = create_app(state, &config.allowed_origins);

    let addr = config.socket_addr()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
