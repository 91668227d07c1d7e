//! HTTP gateway for Briefcast.
//!
//! Exposes the flash briefing feed and a health check:
//!
//! - `GET /health`
//! - `GET /briefings/{briefing_id}?password=...`
//! - `GET /api/alexa/flash_briefings/{briefing_id}?password=...` (when
//!   `gateway.legacy_alexa_route` is enabled)
//!
//! Built on Axum. Failures answer with a bare status code and an empty body.

pub mod responder;

pub use responder::FlashBriefingResponder;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use briefcast_core::{BriefingError, BriefingOutput};

/// Query parameter carrying the shared secret.
pub const PASSWORD_PARAM: &str = "password";

/// Path of the briefing feed.
pub const BRIEFINGS_ENDPOINT: &str = "/briefings/{briefing_id}";

/// Path flash briefing skills were historically pointed at.
pub const ALEXA_FLASH_BRIEFINGS_ENDPOINT: &str = "/api/alexa/flash_briefings/{briefing_id}";

/// Shared application state for the gateway.
///
/// Immutable once built; handlers only read it.
pub struct GatewayState {
    pub responder: FlashBriefingResponder,
    pub legacy_alexa_route: bool,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route(BRIEFINGS_ENDPOINT, get(flash_briefing_handler));

    if state.legacy_alexa_route {
        router = router.route(ALEXA_FLASH_BRIEFINGS_ENDPOINT, get(flash_briefing_handler));
    }

    router
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(config: briefcast_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let responder = FlashBriefingResponder::from_config(&config)?;
    info!(
        briefings = responder.briefing_ids().len(),
        "Flash briefings loaded"
    );

    let state = Arc::new(GatewayState {
        responder,
        legacy_alexa_route: config.gateway.legacy_alexa_route,
    });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Map a briefing failure to the status the caller sees.
pub fn status_for(err: &BriefingError) -> StatusCode {
    match err {
        BriefingError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        BriefingError::NotFound { .. } => StatusCode::NOT_FOUND,
        BriefingError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Pairs of a briefing request's query string, in order.
type BriefingQuery = Vec<(String, String)>;

/// The first [`PASSWORD_PARAM`] value, if any. Later repeats are ignored.
fn password_param(query: &BriefingQuery) -> Option<&str> {
    query
        .iter()
        .find(|(key, _)| key == PASSWORD_PARAM)
        .map(|(_, value)| value.as_str())
}

async fn flash_briefing_handler(
    State(state): State<SharedState>,
    Path(briefing_id): Path<String>,
    query: Result<Query<BriefingQuery>, QueryRejection>,
) -> Result<Json<Vec<BriefingOutput>>, StatusCode> {
    // An unparseable query string carries no usable credential.
    let query = query.map(|Query(pairs)| pairs).unwrap_or_default();
    state
        .responder
        .handle(&briefing_id, password_param(&query))
        .map(Json)
        .map_err(|e| status_for(&e))
}
