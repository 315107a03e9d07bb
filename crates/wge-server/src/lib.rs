//! HTTP boundary for the exporter.
//!
//! Thin axum layer over the core: one extract endpoint, two download
//! endpoints rendered from the cache, an SSE stream of session lifecycle
//! events, and a health check.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use wge_core::{cache::ExtractionCache, events::EventBus, extract::Extractor};

pub mod routes;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub cache: Arc<ExtractionCache>,
    pub events: EventBus,
    /// Serializes resolutions; the bridge session is shared, so a second
    /// in-flight resolve is rejected instead of interleaved.
    pub resolve_lock: Arc<tokio::sync::Mutex<()>>,
    pub resolve_timeout: Duration,
}

impl AppState {
    pub fn new(
        extractor: Arc<Extractor>,
        cache: Arc<ExtractionCache>,
        events: EventBus,
        resolve_timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            cache,
            events,
            resolve_lock: Arc::new(tokio::sync::Mutex::new(())),
            resolve_timeout,
        }
    }
}

/// Build the application router.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/extract", post(routes::extract_handler))
        .route("/api/export/csv", get(routes::export_csv_handler))
        .route("/api/export/vcf", get(routes::export_vcf_handler))
        .route("/api/events", get(routes::events_handler))
        .route("/health", get(routes::health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
