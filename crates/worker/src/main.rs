use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bentahan_engine::{pg, EngineConfig, ExpirationScheduler, LifecycleSignal, Reconciler};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bentahan_worker=debug,bentahan_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = EngineConfig::from_env();
    tracing::info!(
        poll_interval_secs = config.poll_interval.as_secs(),
        "Loaded engine configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = bentahan_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    bentahan_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    bentahan_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Engine ---
    // The hosting shell publishes foreground transitions on this signal.
    let lifecycle = Arc::new(LifecycleSignal::default());
    let reconciler = Arc::new(Reconciler::new(pg::pg_stores(pool), config.clone()));
    let scheduler = ExpirationScheduler::new(reconciler, Arc::clone(&lifecycle), config);
    scheduler.start();

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c");
    tracing::info!("Shutdown signal received");
    scheduler.stop();
}
