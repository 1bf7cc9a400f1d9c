use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::{StoreError, UserStore};

/// Connection status as reported by `/api/dbstate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadyState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
}

impl ReadyState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ReadyState::Connected,
            2 => ReadyState::Connecting,
            _ => ReadyState::Disconnected,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

struct Inner {
    store: OnceCell<Arc<dyn UserStore>>,
    state: AtomicU8,
}

/// Shared slot for the store, filled at most once by the connection manager.
///
/// Cloning is cheap; every clone observes the same store and state.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Inner>,
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreHandle {
    /// An empty handle; requests fail with [`StoreError::Disconnected`]
    /// until a store is published.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                store: OnceCell::new(),
                state: AtomicU8::new(ReadyState::Disconnected.code()),
            }),
        }
    }

    /// A handle that is connected from the start.
    pub fn connected(store: Arc<dyn UserStore>) -> Self {
        let handle = Self::new();
        handle.publish(store);
        handle
    }

    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: ReadyState) {
        // Once published the store stays connected.
        if self.inner.store.initialized() {
            return;
        }
        self.inner.state.store(state.code(), Ordering::Release);
    }

    pub fn publish(&self, store: Arc<dyn UserStore>) {
        if self.inner.store.set(store).is_err() {
            tracing::warn!("Store already published, ignoring new connection");
        }
        self.inner
            .state
            .store(ReadyState::Connected.code(), Ordering::Release);
    }

    /// Current state with a round trip to the store once one is published.
    pub async fn check(&self) -> ReadyState {
        let Ok(store) = self.store() else {
            return self.ready_state();
        };

        match store.ping().await {
            Ok(()) => ReadyState::Connected,
            Err(e) => {
                tracing::warn!("Store ping failed: {}", e);
                ReadyState::Disconnected
            }
        }
    }

    pub fn store(&self) -> Result<Arc<dyn UserStore>, StoreError> {
        self.inner
            .store
            .get()
            .cloned()
            .ok_or(StoreError::Disconnected)
    }
}
