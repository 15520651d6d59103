//! Windowed conversation memory
//!
//! Only the tail of a session's history is fed back into the model. A window
//! of `k` exchanges means the last `2k` messages (one human and one model
//! message per exchange).

use crate::chat::{error::Result, store::ChatStore, types::ChatMessage};

/// Default number of exchanges kept in the prompt window
pub const DEFAULT_WINDOW: usize = 5;

/// Windowed view over a session's history
#[derive(Debug, Clone, Copy)]
pub struct WindowMemory {
    k: usize,
}

impl WindowMemory {
    /// Create a memory window of `k` exchanges
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Load the last `2k` messages of a session, oldest first
    pub async fn load(&self, store: &ChatStore, session_id: &str) -> Result<Vec<ChatMessage>> {
        store.recent(session_id, (self.k * 2) as i64).await
    }
}

impl Default for WindowMemory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Render messages as a speaker-labelled transcript
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}: {}", msg.role.speaker(), msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt for the next model turn from a transcript
pub fn build_chat_prompt(transcript: &str, user_input: &str) -> String {
    format!(
        "Conversation so far:\n{}\nUser: {}\nAI:",
        transcript, user_input
    )
}
