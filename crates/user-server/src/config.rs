use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context};
use url::Url;

use crate::db::RetryPolicy;

pub const DEFAULT_DATABASE_URL: &str = "postgres://root:rootpassword@db:5432/appdb";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
pub const DEFAULT_CONNECT_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_connect_attempts: u32,
    pub db_connect_interval_ms: u64,
    pub db_max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            db_connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            db_connect_interval_ms: DEFAULT_CONNECT_INTERVAL_MS,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            db_connect_attempts: env::var("DB_CONNECT_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_CONNECT_ATTEMPTS.to_string())
                .parse()
                .context("DB_CONNECT_ATTEMPTS must be a non-negative integer")?,
            db_connect_interval_ms: env::var("DB_CONNECT_INTERVAL_MS")
                .unwrap_or_else(|_| DEFAULT_CONNECT_INTERVAL_MS.to_string())
                .parse()
                .context("DB_CONNECT_INTERVAL_MS must be a number of milliseconds")?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_MAX_CONNECTIONS.to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.db_connect_attempts,
            interval: Duration::from_millis(self.db_connect_interval_ms),
        }
    }

    /// Database address with the password masked, safe to expose on the
    /// diagnostics route and in logs.
    pub fn redacted_database_url(&self) -> anyhow::Result<String> {
        let mut url = Url::parse(&self.database_url).context("DATABASE_URL is not a valid URL")?;
        if url.password().is_some() {
            url.set_password(Some("****"))
                .map_err(|_| anyhow!("DATABASE_URL cannot carry credentials"))?;
        }
        Ok(url.to_string())
    }
}
