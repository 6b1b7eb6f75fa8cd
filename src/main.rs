mod auth;
mod clock;
mod config;
mod db;
mod error;
mod extractors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod services;
mod startup;

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use clock::{Clock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;

use db::{PgShiftStore, PgWorkerStore, ShiftStore, WorkerStore};
use models::Worker;
use services::ShiftIntake;

/// A removed user stays authenticated from cache for at most this long; their
/// inserts fail the `"Users"` foreign key and evict the entry.
const WORKER_CACHE_TTL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub shifts: Arc<dyn ShiftStore>,
    pub workers: Arc<dyn WorkerStore>,
    pub intake: ShiftIntake,
    pub clock: Arc<dyn Clock>,
    pub worker_cache: Cache<String, Worker>, // auth id → worker
    pub config: AppConfig,
    pub metrics: Arc<MetricsState>,
}

impl AppState {
    pub fn new(
        shifts: Arc<dyn ShiftStore>,
        workers: Arc<dyn WorkerStore>,
        clock: Arc<dyn Clock>,
        config: AppConfig,
        metrics: Arc<MetricsState>,
    ) -> Self {
        let worker_cache = Cache::builder()
            .time_to_live(WORKER_CACHE_TTL)
            .max_capacity(10_000)
            .build();

        Self {
            intake: ShiftIntake::new(shifts.clone(), clock.clone()),
            shifts,
            workers,
            clock,
            worker_cache,
            config,
            metrics,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables first so RUST_LOG / LOG_FORMAT from .env apply
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,shift_intake=debug,tower_http=debug".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    let db = db::create_pool(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to create database pool: {}", e);
        e
    })?;
    tracing::info!("Database pool created successfully");

    db::run_migrations(&db).await.map_err(|e| {
        tracing::error!("Failed to run migrations: {}", e);
        e
    })?;
    tracing::info!("Migrations applied");

    let metrics_state = Arc::new(handlers::setup_metrics_recorder().map_err(|e| {
        tracing::error!("Failed to install metrics recorder: {}", e);
        e
    })?);
    tracing::info!("Metrics recorder initialized");
    handlers::mark_process_start();

    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState::new(
        Arc::new(PgShiftStore::new(db.clone())),
        Arc::new(PgWorkerStore::new(db)),
        Arc::new(SystemClock),
        config,
        metrics_state,
    ));

    let app = startup::build_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
