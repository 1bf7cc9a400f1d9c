//! A real API server on an ephemeral port, backed by the in-memory store.

use std::sync::Arc;

use tokio::net::TcpListener;
use user_server::{create_router, AppState, Config, MemoryUserStore, StoreHandle};

/// Starts a server and returns its base URL.
pub async fn spawn_server() -> String {
    let store = StoreHandle::connected(Arc::new(MemoryUserStore::new()));
    let app = create_router(AppState::new(Config::default(), store));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
