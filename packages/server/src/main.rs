use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use filmtweet_server::config::AppConfig;
use filmtweet_server::state::AppState;
use filmtweet_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    seed::ensure_indexes(&db)
        .await
        .context("Failed to create required indexes")?;

    if let Some(ref path) = config.seed.movies_file {
        seed::seed_movies(&db, path)
            .await
            .with_context(|| format!("Failed to seed movies from {}", path.display()))?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
