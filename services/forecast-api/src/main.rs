//! Event Forecast API Server
//!
//! Serves weather forecasts for events, using met.no as the upstream.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use forecast_api::config::ForecastConfig;
use forecast_api::state::AppState;

/// Event Forecast API Server
#[derive(Parser, Debug)]
#[command(name = "forecast-api")]
#[command(about = "Weather forecasts for events, backed by met.no")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "FORECAST_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "FORECAST_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config/forecast.yaml", env = "FORECAST_CONFIG")]
    config: String,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        if let Err(e) = run_server(args).await {
            error!("Server failed: {:#}", e);
            std::process::exit(1);
        }
    });
}

async fn run_server(args: Args) -> anyhow::Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting event forecast API server");

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder not installed, metrics disabled: {}", e);
            None
        }
    };

    let config = ForecastConfig::load(&args.config)?.apply_env_overrides()?;
    config.validate()?;

    // Initialize application state
    let state = match AppState::new(&config, metrics) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            std::process::exit(1);
        }
    };

    let app = forecast_api::app(state);

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", args.listen, e))?;

    info!("Event forecast API listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
