//! Event Forecast API Service Library
//!
//! HTTP service answering "what will the weather be at this place when
//! this event starts", backed by a revalidating cache of met.no
//! locationforecast responses.

pub mod config;
pub mod forecast_cache;
pub mod handlers;
pub mod met_client;
pub mod resolver;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Event forecast
        .route(
            "/api/event/forecast",
            get(handlers::forecast::event_forecast_handler),
        )
        // Cache inspection
        .route(
            "/api/cache/stats",
            get(handlers::cache::cache_stats_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .fallback(handlers::forecast::not_found_handler)
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
