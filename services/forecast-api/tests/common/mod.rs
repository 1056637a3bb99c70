//! Shared helpers for forecast-api integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use forecast_api::config::CacheConfig;
use forecast_api::forecast_cache::ForecastCache;
use forecast_api::met_client::{ForecastSource, UpstreamResponse};
use forecast_common::{ForecastError, LocationKey};
use forecast_protocol::WeatherData;

pub const LAST_MODIFIED: &str = "Thu, 28 Nov 2024 13:05:12 GMT";

type Responder =
    dyn Fn(&LocationKey, usize) -> Result<UpstreamResponse, ForecastError> + Send + Sync;

/// In-memory upstream answering from a closure.
///
/// The closure gets the location and the zero-based call number, so a test
/// can script a sequence such as "200, then 304, then failure".
pub struct ScriptedSource {
    calls: AtomicUsize,
    tokens: Mutex<Vec<Option<String>>>,
    delay: Option<std::time::Duration>,
    responder: Box<Responder>,
}

impl ScriptedSource {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&LocationKey, usize) -> Result<UpstreamResponse, ForecastError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
            delay: None,
            responder: Box::new(responder),
        }
    }

    /// Always answer with `payload`, fresh for an hour.
    pub fn always(payload: WeatherData) -> Self {
        Self::new(move |_, _| Ok(modified(payload.clone(), Some(in_future()), None)))
    }

    /// Always fail.
    pub fn failing() -> Self {
        Self::new(|_, _| Err(upstream_down()))
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `If-Modified-Since` values seen, one per call.
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForecastSource for ScriptedSource {
    async fn fetch(
        &self,
        location: &LocationKey,
        if_modified_since: Option<&str>,
    ) -> Result<UpstreamResponse, ForecastError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap()
            .push(if_modified_since.map(str::to_string));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        (self.responder)(location, call)
    }
}

pub fn modified(
    payload: WeatherData,
    expires: Option<DateTime<Utc>>,
    last_modified: Option<&str>,
) -> UpstreamResponse {
    UpstreamResponse::Modified {
        payload,
        expires,
        last_modified: last_modified.map(str::to_string),
    }
}

pub fn upstream_down() -> ForecastError {
    ForecastError::UpstreamUnavailable("upstream returned 503 Service Unavailable".to_string())
}

pub fn in_future() -> DateTime<Utc> {
    Utc::now() + Duration::hours(1)
}

pub fn in_past() -> DateTime<Utc> {
    Utc::now() - Duration::hours(1)
}

pub fn cache_config(default_ttl_secs: u64) -> CacheConfig {
    CacheConfig {
        default_ttl_secs,
        ..Default::default()
    }
}

pub fn cache_over(source: &Arc<ScriptedSource>) -> ForecastCache {
    ForecastCache::new(
        Arc::clone(source) as Arc<dyn ForecastSource>,
        &cache_config(30),
    )
}
