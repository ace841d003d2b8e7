//! AlertHub Server: alert delivery and reminder engine
//!
//! Main entry point that wires all crates together and runs the reminder
//! host until a shutdown signal arrives.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{EnvFilter, fmt};

use alerthub_core::config::AppConfig;
use alerthub_core::error::AppError;
use alerthub_service::{ServiceContext, seed_demo_data};
use alerthub_store::MemoryStore;
use alerthub_worker::{ReminderHost, ReminderScheduler};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ALERTHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AlertHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Store and services ───────────────────────────────
    let store = MemoryStore::new();
    let ctx = ServiceContext::new(&store, &config)?;
    tracing::info!(
        snooze_offset_minutes = config.snooze.utc_offset_minutes,
        default_interval_minutes = config.reminders.default_interval_minutes,
        "Services initialized"
    );

    // ── Step 2: Demo data ────────────────────────────────────────
    if config.bootstrap.seed_demo_data {
        let demo = seed_demo_data(&ctx, Utc::now()).await?;
        tracing::info!(
            alice = %demo.alice,
            incident = %demo.incident,
            "Demo organization seeded"
        );
    }

    // ── Step 3: Reminder host ────────────────────────────────────
    let reminders = Arc::new(ReminderScheduler::new(&ctx, &config.reminders));
    let mut host = ReminderHost::new(reminders, config.scheduler.clone()).await?;
    host.start().await?;

    // ── Step 4: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping reminder host...");
    host.shutdown().await?;

    let metrics = ctx.analytics.metrics(Utc::now()).await?;
    tracing::info!(
        alerts = metrics.total_alerts,
        deliveries = metrics.total_deliveries,
        read = metrics.total_read,
        "Final delivery metrics"
    );

    tracing::info!("AlertHub shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
