use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use favs_api::config::{self, DatabaseBackend};
use favs_api::database::DatabaseManager;
use favs_api::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "favs-api", version, about = "Favorites lists REST backend")]
struct Args {
    /// Port to listen on (overrides FAVS_API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Storage backend: mongo or memory (overrides DATABASE_BACKEND)
    #[arg(short, long)]
    backend: Option<DatabaseBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("favs_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let settings = config::config();
    tracing::info!("Starting Favs API in {:?} mode", settings.environment);

    let mut database = settings.database.clone();
    if let Some(backend) = args.backend {
        database.backend = backend;
    }

    if favs_api::is_production!() {
        if settings.security.jwt_secret.is_empty() {
            tracing::warn!("JWT_SECRET is not set; every token operation will fail");
        }
        if database.backend == DatabaseBackend::Memory {
            tracing::warn!("In-memory backend in production; data is lost on restart");
        }
    }

    let manager = DatabaseManager::connect(&database)
        .await
        .context("failed to initialize database")?;
    let app = favs_api::app(AppState::new(manager));

    let port = args.port.unwrap_or(settings.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Favs API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
