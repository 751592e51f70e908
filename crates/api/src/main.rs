use std::net::SocketAddr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cheers_api::config::ServerConfig;
use cheers_api::router::build_app_router;
use cheers_api::state::AppState;
use cheers_db::DatabaseConfig;
use cheers_worker::CelebrationScheduler;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cheers_api=debug,cheers_worker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.slack.signing_secret.is_none() {
        tracing::warn!("SLACK_SIGNING_SECRET is not set; /slack/events will reject requests");
    }

    // --- Database ---
    let db_config = DatabaseConfig::from_env().expect("DATABASE_URL must be set");
    let pool = cheers_db::create_pool(&db_config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

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
    let clients = cheers_slack::build_clients(&config.slack, pool.clone())
        .expect("Failed to build Slack client");
    tracing::info!(mode = ?config.slack.mode, "Slack client ready");

    // --- App state ---
    let state = AppState::new(pool, config.clone(), clients);

    // --- Scheduler ---
    let scheduler_cancel = CancellationToken::new();
    let scheduler_handle = if config.scheduler.enabled {
        let scheduler =
            CelebrationScheduler::new(state.dispatcher.clone(), config.scheduler.poll_interval);
        let cancel = scheduler_cancel.clone();
        Some(tokio::spawn(async move {
            scheduler.run(cancel).await;
        }))
    } else {
        tracing::info!("Celebration scheduler disabled");
        None
    };

    // --- Start server ---
    let app = build_app_router(state);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    scheduler_cancel.cancel();
    if let Some(handle) = scheduler_handle {
        let _ = tokio::time::timeout(Duration::from_secs(config.shutdown_timeout_secs), handle).await;
        tracing::info!("Celebration scheduler stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
