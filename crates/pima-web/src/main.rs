//! Pima prediction service
//!
//! Run with: cargo run -p pima-web --bin pima-server

use pima_config::Config;
use pima_web::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pima_web=info,tower_http=info,warn")),
        )
        .init();

    let config = Config::load()?;
    let state = AppState::load(&config.server)?;
    let app = build_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
