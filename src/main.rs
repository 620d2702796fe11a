use std::sync::Arc;

use stockade::company::repository_sqlx::SqlxCompanyConfigRepository;
use stockade::config::AppConfig;
use stockade::db::Db;
use stockade::logger::init_tracing;
use stockade::metrics::counters::Counters;
use stockade::order::repository_sqlx::{SqlxOrderRepository, SqlxReservationStore};
use stockade::order::service::ReservationService;
use stockade::order::usecase::ReserveAndAddUseCase;
use stockade::product::repository_sqlx::SqlxProductRepository;
use stockade::product::usecase::SearchProductsUseCase;
use stockade::server::{self, AppState};

/// Wires repositories, engine, and use cases onto one shared pool.
fn build_state(db: &Db, cfg: &AppConfig) -> AppState {
    let store = Arc::new(SqlxReservationStore::new(db.pool.clone()));
    let reservation_svc = Arc::new(ReservationService::new(store, cfg.tx_timeout));

    let reserve = Arc::new(ReserveAndAddUseCase::new(
        Arc::new(SqlxOrderRepository::new(db.pool.clone())),
        Arc::new(SqlxCompanyConfigRepository::new(db.pool.clone())),
        reservation_svc,
        Counters::default(),
        cfg.max_retry_attempts,
    ));

    let products = Arc::new(SearchProductsUseCase::new(Arc::new(
        SqlxProductRepository::new(db.pool.clone()),
    )));

    AppState { reserve, products }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env();

    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(&cfg.log_level, is_production);

    tracing::info!("starting stockade...");

    let db = Db::connect(&cfg).await?;
    db.migrate().await?;
    tracing::info!("database connected");

    let state = build_state(&db, &cfg);
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.server_port)).await?;
    tracing::info!(port = cfg.server_port, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped gracefully");
    Ok(())
}
