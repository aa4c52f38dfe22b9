use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::config;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "habit-tracker-api")]
#[command(about = "Habit Tracker API - personal habit tracking over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listen port, overrides HABIT_API_PORT/PORT")]
        port: Option<u16>,

        #[arg(long, help = "Do not apply pending migrations on startup")]
        skip_migrations: bool,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Command::Serve {
        port: None,
        skip_migrations: false,
    });

    match command {
        Command::Serve {
            port,
            skip_migrations,
        } => serve(port, skip_migrations).await,
        Command::Migrate => {
            DatabaseManager::migrate().await.context("migration failed")?;
            DatabaseManager::close().await;
            Ok(())
        }
    }
}

async fn serve(port: Option<u16>, skip_migrations: bool) -> anyhow::Result<()> {
    let config = config();
    info!("Starting Habit Tracker API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set outside development");
    }

    if !skip_migrations {
        DatabaseManager::migrate().await.context("migration failed")?;
    }

    let port = port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Habit Tracker API listening on http://{}", bind_addr);

    axum::serve(listener, crate::app::app())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
