use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod mapper;
mod routes;
mod safety;
mod state;
mod suggestions;
#[cfg(test)]
mod test_support;

use state::AppState;

#[derive(Parser)]
#[command(name = "travel-buddy-server")]
#[command(about = "Trip, itinerary and chat data API for the travel buddy apps")]
#[command(version)]
struct Cli {
    /// Config file (overrides TRAVEL_BUDDY_CONFIG and the default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not insert demo data into an empty database
    #[arg(long)]
    no_seed: bool,

    /// Create the schema, seed, then exit without serving
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env is optional
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_buddy_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::load(cli.config.as_deref())?;

    // Initialize database
    let db = db::Database::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("opening database {}", config.database.url))?;
    db.run_migrations().await.context("running migrations")?;
    tracing::info!("Database ready at {}", config.database.url);

    if config.database.seed_demo_data && !cli.no_seed {
        match db.seed_demo_data(&config.auth.demo_user_id).await {
            Ok(true) => tracing::info!("Seeded demo data (trip {})", db::DEMO_TRIP_ID),
            Ok(false) => {}
            Err(e) if config.database.seed_failure_fatal => {
                return Err(e).context("seeding demo data");
            }
            Err(e) => tracing::error!("Failed to seed demo data, continuing: {}", e),
        }
    }

    if cli.migrate_only {
        return Ok(());
    }

    // Create app state
    let state = AppState::new(db, config.clone());

    // Build router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Travel buddy server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}
