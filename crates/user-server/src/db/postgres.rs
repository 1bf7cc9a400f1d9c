use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use user_shared::User;
use uuid::Uuid;

use super::{Connector, StoreError, UserStore};

pub type DbPool = PgPool;

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Creates the users table and its unique email index if they are missing.
pub async fn ensure_schema(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL CHECK (name <> ''),
            email TEXT NOT NULL CHECK (email <> ''),
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Could not create users table")?;

    sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)")
        .execute(pool)
        .await
        .context("Could not create users email index")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS users_created_at_idx ON users (created_at DESC)")
        .execute(pool)
        .await
        .context("Could not create users created_at index")?;

    Ok(())
}

const EMAIL_KEY: &str = "users_email_key";

fn map_write_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => StoreError::Duplicate {
            key: db_err.constraint().unwrap_or(EMAIL_KEY).to_string(),
        },
        other => StoreError::Database(other),
    }
}

pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, name: &str, email: &str) -> Result<User, StoreError> {
        let now = Utc::now();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update(&self, id: Uuid, name: &str, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $1,
                email = $2,
                updated_at = $3
            WHERE id = $4
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Opens a Postgres pool and prepares the schema.
pub struct PgConnector {
    database_url: String,
    max_connections: u32,
}

impl PgConnector {
    pub fn new(database_url: &str, max_connections: u32) -> Self {
        Self {
            database_url: database_url.to_string(),
            max_connections,
        }
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self) -> anyhow::Result<Arc<dyn UserStore>> {
        let pool = create_pool(&self.database_url, self.max_connections).await?;
        ensure_schema(&pool).await?;
        Ok(Arc::new(PgUserStore::new(pool)))
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("fake database error")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.unique.then(|| Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    fn db_error(unique: bool, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { unique, constraint }))
    }

    #[test]
    fn unique_violation_reports_its_constraint() {
        let err = map_write_error(db_error(true, Some("users_pkey")));
        assert!(matches!(err, StoreError::Duplicate { key } if key == "users_pkey"));
    }

    #[test]
    fn unique_violation_without_constraint_falls_back_to_email_key() {
        let err = map_write_error(db_error(true, None));
        assert!(matches!(err, StoreError::Duplicate { key } if key == EMAIL_KEY));
    }

    #[test]
    fn other_errors_pass_through() {
        assert!(matches!(
            map_write_error(db_error(false, Some(EMAIL_KEY))),
            StoreError::Database(_)
        ));
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            StoreError::Database(sqlx::Error::RowNotFound)
        ));
    }
}
