//! Morra player service entry point.

use std::sync::{Arc, Mutex};

use morra_api::config::AppConfig;
use morra_api::error::AppError;
use morra_api::metrics::GameMetrics;
use morra_api::state::AppState;
use morra_api::{build_router, telemetry};
use morra_core::clock::{Clock, SystemClock};
use morra_core::repository::RoundStore;
use morra_core::rng::{DeterministicRng, SystemRng};
use morra_round_store::pg_round_store::PgRoundStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(?config, "starting morra player service");

    let round_store = match config.database_url.as_deref() {
        Some(url) => Some(connect_round_store(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set; rounds will not be recorded");
            None
        }
    };

    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::from_entropy()));
    let metrics = Arc::new(GameMetrics::new()?);
    let app_state = AppState::new(clock, rng, round_store, metrics);

    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http().make_span_with(telemetry::make_request_span))
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    telemetry.shutdown();

    Ok(())
}

/// Parses the connection string and applies pending migrations.
///
/// A migration failure is logged rather than fatal: the database may be
/// unreachable at boot and come up later, and each record request opens its
/// own connection.
async fn connect_round_store(url: &str) -> Result<Arc<dyn RoundStore>, sqlx::Error> {
    let store = PgRoundStore::new(url)?;

    if let Err(e) = store.run_migrations().await {
        tracing::warn!(error = %e, "could not apply migrations at startup");
    }

    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
