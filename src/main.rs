use clap::Parser;
use habit_tracker_api::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let request_logging = if habit_tracker_api::config::config().api.enable_request_logging {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("habit_tracker_api=info,tower_http={}", request_logging))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    if let Err(e) = habit_tracker_api::cli::run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
