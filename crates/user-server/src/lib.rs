pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod routes;

pub use config::Config;
pub use db::{ConnectionManager, MemoryUserStore, PgConnector, ReadyState, RetryPolicy, StoreHandle};
pub use repository::UserRepository;
pub use routes::{create_router, AppState};
