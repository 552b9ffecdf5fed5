//! Discount scheduler binary.
//!
//! Wires the PostgreSQL store, system clock, and tick handler into the
//! background scheduler service, and runs it until SIGINT.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use discount_scheduler::adapters::{
    PlanSchedulerConfig, PlanSchedulerService, PostgresDiscountStore, SystemClock,
};
use discount_scheduler::application::handlers::plans::ProcessPlansHandler;
use discount_scheduler::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,discount_scheduler=debug")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let store = Arc::new(PostgresDiscountStore::new(pool));
    let clock = Arc::new(SystemClock);
    let handler = Arc::new(ProcessPlansHandler::new(store.clone(), store, clock));

    let service = PlanSchedulerService::with_config(
        handler,
        PlanSchedulerConfig::default().with_tick_interval(config.scheduler.tick_interval()),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    tracing::info!(
        tick_interval_secs = config.scheduler.tick_interval_secs,
        "discount scheduler started"
    );
    service.run(shutdown_rx).await;
    tracing::info!("discount scheduler stopped");

    Ok(())
}
