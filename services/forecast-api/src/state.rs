//! Application state for the forecast API.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::config::ForecastConfig;
use crate::forecast_cache::ForecastCache;
use crate::met_client::{ForecastSource, MetClient};
use crate::resolver::ForecastResolver;

/// Shared application state.
pub struct AppState {
    /// Event forecast resolver (owns the forecast cache).
    pub resolver: ForecastResolver,

    /// Prometheus recorder handle, when one is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new AppState talking to met.no.
    pub fn new(config: &ForecastConfig, metrics: Option<PrometheusHandle>) -> Result<Self> {
        config.validate()?;
        let client = MetClient::new(&config.upstream)?;
        tracing::info!("Using upstream forecast endpoint {}", config.upstream.base_url);
        Ok(Self::with_source(config, Arc::new(client), metrics))
    }

    /// Create an AppState around any forecast source.
    pub fn with_source(
        config: &ForecastConfig,
        source: Arc<dyn ForecastSource>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let cache = ForecastCache::new(source, &config.cache);
        let resolver = ForecastResolver::new(cache, config.validation.max_lead_days);

        Self { resolver, metrics }
    }

    pub fn cache(&self) -> &ForecastCache {
        self.resolver.cache()
    }
}
