use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use carebook_server::{create_app, CareBookServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading configuration; missing file is fine.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = ServerConfig::from_env();
    info!("Starting {}", config.name);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Bind address: {}", config.bind_addr);

    let server = CareBookServer::new_in_memory(config.clone()).await?;
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!("Health check available at: http://{}/api/health", config.bind_addr);
    info!("API docs available at: http://{}/docs", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "carebook_server=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
