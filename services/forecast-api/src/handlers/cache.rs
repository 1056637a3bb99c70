//! Cache inspection handlers.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::instrument;

use crate::forecast_cache::ForecastCacheStatsSnapshot;
use crate::state::AppState;

/// GET /api/cache/stats - Forecast cache counters and entry count
#[instrument(skip(state))]
pub async fn cache_stats_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<ForecastCacheStatsSnapshot> {
    let cache = state.cache();
    let entries = cache.entry_count().await;
    Json(cache.stats().snapshot(entries))
}
