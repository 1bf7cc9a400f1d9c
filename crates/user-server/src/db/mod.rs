//! Store layer: the `UserStore` abstraction, its Postgres and in-memory
//! implementations, and the connection manager that publishes a live store
//! into a shared [`StoreHandle`].

mod connection;
mod handle;
mod memory;
mod postgres;

use async_trait::async_trait;
use user_shared::User;
use uuid::Uuid;

pub use connection::{ConnectionManager, Connector, RetryPolicy};
pub use handle::{ReadyState, StoreHandle};
pub use memory::MemoryUserStore;
pub use postgres::{create_pool, ensure_schema, DbPool, PgConnector, PgUserStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write collided with the unique index on `email`.
    #[error("duplicate key on {key}")]
    Duplicate { key: String },

    #[error("database not connected")]
    Disconnected,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence primitives for user records.
///
/// Implementations own uniqueness of `email`: a conflicting insert or update
/// must fail with [`StoreError::Duplicate`] and leave the store unchanged.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, most recently created first.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn insert(&self, name: &str, email: &str) -> Result<User, StoreError>;

    /// Returns `None` when no record has `id`.
    async fn update(&self, id: Uuid, name: &str, email: &str) -> Result<Option<User>, StoreError>;

    /// Returns `false` when no record has `id`.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Round trip to the backing store; fails once the connection is gone.
    async fn ping(&self) -> Result<(), StoreError>;
}
