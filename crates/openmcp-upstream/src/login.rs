//! Login Session Store
//!
//! Pending QR-code logins keyed by their opaque id. Bounded by an LRU
//! capacity and a time-to-live; expiry is checked on every lookup and swept on
//! every insert.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone)]
struct Session<V> {
    value: V,
    created_at: Instant,
}

impl<V> Session<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

pub struct LoginSessionStore<V> {
    sessions: Mutex<LruCache<String, Session<V>>>,
    ttl: Duration,
}

impl<V: Clone> LoginSessionStore<V> {
    /// A capacity of zero is treated as one
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn insert(&self, id: impl Into<String>, value: V) {
        let mut sessions = self.sessions.lock().await;
        let swept = sweep_locked(&mut sessions, self.ttl);
        if swept > 0 {
            debug!(swept, "Expired login sessions removed");
        }
        if let Some((evicted, _)) = sessions.push(
            id.into(),
            Session {
                value,
                created_at: Instant::now(),
            },
        ) {
            debug!(session = %evicted, "Login session evicted at capacity");
        }
    }

    /// Live session for `id`. An expired entry is removed and reported absent.
    pub async fn get(&self, id: &str) -> Option<V> {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(id)?.is_expired(self.ttl) {
            sessions.pop(id);
            debug!(session = %id, "Login session expired");
            return None;
        }
        sessions.peek(id).map(|session| session.value.clone())
    }

    pub async fn remove(&self, id: &str) -> Option<V> {
        self.sessions.lock().await.pop(id).map(|s| s.value)
    }

    /// Drop every expired session, returning how many were removed
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        sweep_locked(&mut sessions, self.ttl)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

fn sweep_locked<V>(sessions: &mut LruCache<String, Session<V>>, ttl: Duration) -> usize {
    let expired: Vec<String> = sessions
        .iter()
        .filter(|(_, session)| session.is_expired(ttl))
        .map(|(id, _)| id.clone())
        .collect();
    for id in &expired {
        sessions.pop(id);
    }
    expired.len()
}
