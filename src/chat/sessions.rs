//! In-memory registry of started chat sessions

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// State of a started session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Whether the session may stream replies
    pub active: bool,

    /// Pending user input for the next stream request
    pub last_chat: Option<String>,
}

/// Shared registry of sessions that have been started
///
/// Starting an unknown session activates it; starting a known session only
/// replaces its pending input.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, SessionState>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, or update the pending input of a started one
    pub async fn start(&self, session_id: &str, last_chat: Option<String>) {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(session_id) {
            Some(state) => {
                state.last_chat = last_chat;
            }
            None => {
                sessions.insert(
                    session_id.to_string(),
                    SessionState {
                        active: true,
                        last_chat,
                    },
                );
            }
        }
    }

    /// Look up the state of a session
    pub async fn get(&self, session_id: &str) -> Option<SessionState> {
        self.inner.read().await.get(session_id).cloned()
    }
}
