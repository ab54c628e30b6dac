//! Per-session values, keyed by the session cookie
//!
//! The only value kept today is the home page visit counter. A counter that
//! was never written reads as 1; recording a visit reports the value read and
//! stores that value plus one.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Count one visit and return the counter as it was before incrementing
    async fn record_visit(&self, session_id: &str) -> AppResult<i64>;
}

/// Process-local session store, lost on restart
#[derive(Default)]
pub struct MemorySessionStore {
    visits: Mutex<HashMap<String, i64>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored counter, `None` for a session that never visited
    #[cfg(test)]
    pub(crate) async fn stored_visits(&self, session_id: &str) -> Option<i64> {
        self.visits.lock().await.get(session_id).copied()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let mut visits = self.visits.lock().await;
        let counter = visits.entry(session_id.to_string()).or_insert(1);
        let current = *counter;
        *counter = current + 1;
        Ok(current)
    }
}
