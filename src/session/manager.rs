//! Registry of live dialogue sessions

use super::delay::ThinkingDelay;
use super::runtime::{DialogueHandle, SessionRuntime};
use crate::resolver::ResponseResolver;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest sweep period the reaper accepts
const MIN_SWEEP: Duration = Duration::from_millis(1);

/// Creates sessions and looks them up by id
pub struct SessionManager {
    resolver: ResponseResolver,
    delay: ThinkingDelay,
    sessions: RwLock<HashMap<String, DialogueHandle>>,
}

impl SessionManager {
    pub fn new(resolver: ResponseResolver, delay: ThinkingDelay) -> Self {
        Self {
            resolver,
            delay,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn resolver(&self) -> &ResponseResolver {
        &self.resolver
    }

    /// Start a new session with a fresh id
    pub async fn create(&self) -> DialogueHandle {
        let id = uuid::Uuid::new_v4().to_string();
        let handle = SessionRuntime::spawn(id.clone(), self.resolver.clone(), self.delay);
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    /// Live session by id; closed sessions are pruned on lookup
    pub async fn get(&self, id: &str) -> Option<DialogueHandle> {
        let handle = self.sessions.read().await.get(id).cloned()?;
        if handle.is_closed() {
            self.sessions.write().await.remove(id);
            return None;
        }
        Some(handle)
    }

    /// Close and forget a session. Returns `false` if it did not exist.
    pub async fn close(&self, id: &str) -> bool {
        match self.sessions.write().await.remove(id) {
            Some(handle) => {
                handle.close();
                tracing::info!(session_id = %id, "Session closed");
                true
            }
            None => false,
        }
    }

    /// Close every session, cancelling their outstanding turns
    pub async fn close_all(&self) {
        let sessions = std::mem::take(&mut *self.sessions.write().await);
        for handle in sessions.values() {
            handle.close();
        }
        tracing::info!(count = sessions.len(), "All sessions closed");
    }

    /// Close and forget sessions idle for at least `max_idle`, and any already closed.
    ///
    /// Returns how many were removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, handle| {
            if handle.is_closed() {
                return false;
            }
            let idle = handle.idle_for();
            if idle < max_idle {
                return true;
            }
            tracing::info!(session_id = %id, idle_secs = idle.as_secs(), "Evicting idle session");
            handle.close();
            false
        });
        before - sessions.len()
    }

    /// Periodically evict idle sessions until the manager is dropped
    pub fn spawn_reaper(self: &Arc<Self>, every: Duration, max_idle: Duration) -> JoinHandle<()> {
        let manager = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every.max(MIN_SWEEP));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                let evicted = manager.evict_idle(max_idle).await;
                if evicted > 0 {
                    tracing::debug!(evicted, "Idle sweep finished");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
