//! # Renalis HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /stages` - The five stage records
//! - `GET /stages/{stage}` - One stage record (404 outside 1-5)
//! - `POST /assess` - Stage a measurement
//! - `POST /patients/{id}/history` - Stage and record a measurement
//! - `GET /patients/{id}/history` - A patient's history
//! - `GET /patients/{id}/trend` - A patient's trend
//! - `GET /status` - History status
//! - `POST /export` - Export history as a base64 snapshot
//!
//! ## Security Configuration
//!
//! See [`ServerConfig`]: CORS origins (default: localhost only), rate limit
//! (default: 100 rps, 0 to disable) and an optional Bearer API key.

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::ApiKey;
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    ExportResponse, HealthResponse, HistoryEntryJson, HistoryResponse, MeasurementRequest,
    RecommendationsJson, RecordRequest, RecordResponse, StageRecordJson, StageRecordResponse,
    StagingResponse, StatusResponse, TrendResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use renalis_core::{CkdError, Session};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (64 KB). Measurement bodies are tiny.
const MAX_BODY_SIZE: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the staging session.
#[derive(Clone)]
pub struct AppState {
    /// The session holding the staging history.
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Create new app state with a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allows all origins (development only)
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - protects against DoS (if enabled)
/// 5. Authentication - validates API key (if configured)
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(&config.cors_origins);

    let rate_limiter = create_rate_limiter(config.rate_limit);
    match rate_limiter {
        Some(_) => tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit),
        None => tracing::info!("Rate limiting disabled"),
    }

    let api_key = config.api_key.as_deref().map(ApiKey::new);
    if api_key.is_some() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set RENALIS_API_KEY or server.api_key to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/stages", get(handlers::stages_handler))
        .route("/stages/{stage}", get(handlers::stage_handler))
        .route("/assess", post(handlers::assess_handler))
        .route(
            "/patients/{id}/history",
            get(handlers::history_handler).post(handlers::record_handler),
        )
        .route("/patients/{id}/trend", get(handlers::trend_handler))
        .route("/status", get(handlers::status_handler))
        .route("/export", post(handlers::export_handler));

    // Authentication is innermost and runs last on the request
    if let Some(key) = api_key {
        router = router.layer(axum_middleware::from_fn_with_state(
            key,
            auth::api_key_auth_middleware,
        ));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(session: Session, config: &ServerConfig) -> Result<(), CkdError> {
    let addr = config.bind_addr();
    let router = create_router(AppState::new(session), config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CkdError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Renalis HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| CkdError::IoError(format!("Server error: {}", e)))
}
