//! Bookkeeping of the sessions that are currently streaming.
//!
//! Every tracked session leaves its cancellation handle here for as long as it
//! runs. The server uses the registry to report how many streams are open and
//! to cancel all of them when it shuts down.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    open: HashMap<u64, CancellationToken>,
}

/// Shared table of open sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl SessionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an open session. It stays registered until the ticket is dropped.
    pub fn register(&self, cancel: CancellationToken) -> SessionTicket {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.open.insert(id, cancel);
        SessionTicket {
            id,
            registry: self.clone(),
        }
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.lock().open.len()
    }

    /// Whether no session is open.
    pub fn is_empty(&self) -> bool {
        self.lock().open.is_empty()
    }

    /// Cancel every open session. Returns how many were signalled.
    pub fn cancel_all(&self) -> usize {
        let inner = self.lock();
        for cancel in inner.open.values() {
            cancel.cancel();
        }
        inner.open.len()
    }
}

/// Registration of one session; dropping it removes the entry.
#[derive(Debug)]
pub struct SessionTicket {
    id: u64,
    registry: SessionRegistry,
}

impl SessionTicket {
    /// Registry-wide id of the session.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for SessionTicket {
    fn drop(&mut self) {
        self.registry.lock().open.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_unregister_on_drop() {
        let registry = SessionRegistry::new();
        let a = registry.register(CancellationToken::new());
        let b = registry.register(CancellationToken::new());
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);

        drop(a);
        assert_eq!(registry.len(), 1);
        drop(b);
        assert!(registry.is_empty());
    }

    #[test]
    fn cancel_all_signals_every_open_session() {
        let registry = SessionRegistry::new();
        let first = CancellationToken::new();
        let second = CancellationToken::new();
        let _a = registry.register(first.clone());
        let b = registry.register(second.clone());
        let gone = CancellationToken::new();
        drop(registry.register(gone.clone()));
        drop(b);

        assert_eq!(registry.cancel_all(), 1);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!gone.is_cancelled());
    }
}
