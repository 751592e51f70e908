//! Standalone scheduler process.
//!
//! Runs only the celebration scheduler, for deployments that keep the API
//! and the scheduler in separate processes (set `SCHEDULER_ENABLED=false`
//! on the API in that case).

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cheers_db::DatabaseConfig;
use cheers_slack::config::SlackConfig;
use cheers_worker::config::SchedulerConfig;
use cheers_worker::{CelebrationDispatcher, CelebrationScheduler};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cheers_worker=debug,cheers_slack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Database ---
    let db_config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
    let pool = cheers_db::create_pool(&db_config)
        .await
        .expect("Failed to connect to database");
    cheers_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    if db_config.migrations_auto_apply {
        cheers_db::run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");
    }

    // --- Slack ---
    let slack_config = SlackConfig::from_env();
    let clients = cheers_slack::build_clients(&slack_config, pool.clone())
        .expect("Failed to build Slack client");
    tracing::info!(mode = ?slack_config.mode, "Slack client ready");

    // --- Scheduler ---
    let scheduler_config = SchedulerConfig::from_env();
    let dispatcher = CelebrationDispatcher::new(pool, clients.messenger);
    let scheduler = CelebrationScheduler::new(dispatcher, scheduler_config.poll_interval);

    let cancel = CancellationToken::new();
    let scheduler_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        scheduler.run(scheduler_cancel).await;
    });

    shutdown_signal().await;
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(10), handle).await;
    tracing::info!("Worker stopped");
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
