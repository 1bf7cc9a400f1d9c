use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use super::{ReadyState, StoreHandle, UserStore};

/// Something that can open a store.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> anyhow::Result<Arc<dyn UserStore>>;
}

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_millis(3000),
        }
    }
}

/// Brings the store up at startup.
///
/// On success the store is published into the handle; after the last failed
/// attempt the handle is left disconnected and the process keeps running.
pub struct ConnectionManager<C> {
    connector: C,
    policy: RetryPolicy,
    handle: StoreHandle,
}

impl<C: Connector + 'static> ConnectionManager<C> {
    pub fn new(connector: C, policy: RetryPolicy, handle: StoreHandle) -> Self {
        Self {
            connector,
            policy,
            handle,
        }
    }

    /// Runs the retry loop to completion. Returns whether a store was published.
    pub async fn run(&self) -> bool {
        self.handle.set_state(ReadyState::Connecting);

        for attempt in 1..=self.policy.max_attempts {
            match self.connector.connect().await {
                Ok(store) => {
                    self.handle.publish(store);
                    tracing::info!(attempt, "Connected to database");
                    return true;
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        "Database connection attempt {} failed: {:#}",
                        attempt,
                        e
                    );
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }

        self.handle.set_state(ReadyState::Disconnected);
        tracing::error!(
            "Could not connect to database after {} attempts; serving in degraded mode",
            self.policy.max_attempts
        );
        false
    }

    pub fn spawn(self) -> JoinHandle<bool> {
        tokio::spawn(async move { self.run().await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::anyhow;

    use super::*;
    use crate::db::MemoryUserStore;

    /// Fails a fixed number of times before handing out a memory store.
    struct FlakyConnector {
        failures: u32,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Connector for FlakyConnector {
        async fn connect(&self) -> anyhow::Result<Arc<dyn UserStore>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(anyhow!("connection refused"));
            }
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn connects_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let handle = StoreHandle::new();
        let manager = ConnectionManager::new(
            FlakyConnector {
                failures: 2,
                calls: Arc::clone(&calls),
            },
            fast_policy(5),
            handle.clone(),
        );

        assert!(manager.run().await);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(handle.ready_state(), ReadyState::Connected);
        assert!(handle.store().is_ok());
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts_and_stays_degraded() {
        let calls = Arc::new(AtomicU32::new(0));
        let handle = StoreHandle::new();
        let manager = ConnectionManager::new(
            FlakyConnector {
                failures: u32::MAX,
                calls: Arc::clone(&calls),
            },
            fast_policy(3),
            handle.clone(),
        );

        let connected = manager.spawn().await.unwrap();

        assert!(!connected);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(handle.ready_state().code(), 0);
        assert!(handle.store().is_err());
    }

    #[test]
    fn default_policy_is_five_attempts_three_seconds_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.interval, Duration::from_secs(3));
    }
}
