use std::net::SocketAddr;

use tabli_api::{app, worker, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabli_api=debug,tabli_store=info,tabli_core=info,tabli_floor=info,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tabli_store::app_config::Config::load()?;
    tracing::info!("Starting Tabli API on port {}", config.server.port);

    let app_state = AppState::from_config(&config).await?;
    worker::start_hold_sweeper(app_state.clone());

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
