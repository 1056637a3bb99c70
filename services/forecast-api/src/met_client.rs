//! Upstream forecast source.
//!
//! [`ForecastSource`] is the seam between the cache and the network: the
//! cache only ever sees an [`UpstreamResponse`] or a [`ForecastError`].
//! [`MetClient`] is the production implementation talking to met.no.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use tracing::{debug, instrument, warn};

use forecast_common::{ForecastError, LocationKey};
use forecast_protocol::WeatherData;

use crate::config::UpstreamConfig;

/// Outcome of a successful upstream exchange.
#[derive(Debug, Clone)]
pub enum UpstreamResponse {
    /// The payload has not changed since the revalidation token was issued.
    NotModified,

    /// A new payload with its freshness metadata.
    Modified {
        payload: WeatherData,
        /// Parsed `Expires` header.
        expires: Option<DateTime<Utc>>,
        /// Raw `Last-Modified` header, echoed back on revalidation.
        last_modified: Option<String>,
    },
}

/// Something that can fetch a forecast for a location.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the forecast for `location`.
    ///
    /// When `if_modified_since` is set the request is conditional, and an
    /// unchanged forecast comes back as [`UpstreamResponse::NotModified`].
    async fn fetch(
        &self,
        location: &LocationKey,
        if_modified_since: Option<&str>,
    ) -> Result<UpstreamResponse, ForecastError>;
}

/// met.no locationforecast client.
pub struct MetClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl MetClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('?').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Upstream URL for a location, coordinates at 6 decimal places.
    pub fn request_url(&self, location: &LocationKey) -> String {
        format!(
            "{}?lat={}&lon={}",
            self.base_url,
            location.latitude(),
            location.longitude()
        )
    }
}

#[async_trait]
impl ForecastSource for MetClient {
    #[instrument(skip(self, location), fields(location = %location))]
    async fn fetch(
        &self,
        location: &LocationKey,
        if_modified_since: Option<&str>,
    ) -> Result<UpstreamResponse, ForecastError> {
        let url = self.request_url(location);

        let mut request = self
            .client
            .get(&url)
            .header(header::USER_AGENT, &self.user_agent);
        if let Some(token) = if_modified_since {
            request = request.header(header::IF_MODIFIED_SINCE, token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Upstream request failed");
            ForecastError::UpstreamUnavailable(format!("request to upstream failed: {}", e))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            debug!("Upstream reported not modified");
            return Ok(UpstreamResponse::NotModified);
        }
        if !status.is_success() {
            warn!(status = %status, "Upstream returned an error status");
            return Err(ForecastError::UpstreamUnavailable(format!(
                "upstream returned {}",
                status
            )));
        }

        let headers = response.headers();
        let expires = headers
            .get(header::EXPIRES)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date);
        let last_modified = headers
            .get(header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            ForecastError::UpstreamUnavailable(format!("failed to read upstream body: {}", e))
        })?;
        if body.is_empty() {
            warn!("Upstream returned an empty body");
            return Err(ForecastError::UpstreamUnavailable(
                "upstream returned an empty body".to_string(),
            ));
        }

        let payload: WeatherData = serde_json::from_slice(&body)?;

        debug!(
            samples = payload.timeseries().len(),
            expires = ?expires,
            last_modified = ?last_modified,
            "Fetched forecast from upstream"
        );

        Ok(UpstreamResponse::Modified {
            payload,
            expires,
            last_modified,
        })
    }
}

/// Parse an HTTP date such as `Fri, 29 Nov 2024 13:34:26 GMT`.
///
/// Unparseable values are logged and treated as absent.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            warn!(value = %value, error = %e, "Ignoring unparseable HTTP date");
            None
        }
    }
}
