use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_server::{create_router, AppState, Config, ConnectionManager, PgConnector, StoreHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // The server keeps serving while the database is unreachable; the
    // connection manager publishes the store once a connection succeeds.
    let store = StoreHandle::new();
    let connector = PgConnector::new(&config.database_url, config.db_max_connections);
    ConnectionManager::new(connector, config.retry_policy(), store.clone()).spawn();

    let app = create_router(AppState::new(config.clone(), store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
