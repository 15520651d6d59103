use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user
    Human,
    /// The model
    Ai,
}

impl ChatRole {
    /// Role string as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::Human => "human",
            ChatRole::Ai => "ai",
        }
    }

    /// Parse a role string from the database
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "human" => Some(ChatRole::Human),
            "ai" => Some(ChatRole::Ai),
            _ => None,
        }
    }

    /// Speaker label used when rendering a transcript
    pub fn speaker(&self) -> &'static str {
        match self {
            ChatRole::Human => "Human",
            ChatRole::Ai => "AI",
        }
    }
}

/// A chat message read from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier for the message
    pub id: Uuid,

    /// Session the message belongs to
    pub session_id: String,

    /// Who authored the message
    pub role: ChatRole,

    /// Message text
    pub content: String,

    /// Ordinal position across the whole store
    pub position: i64,

    /// UTC timestamp when the message was written
    pub created_at: DateTime<Utc>,
}
