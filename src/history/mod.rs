//! Conversation history
//!
//! Append-only record of the exchange between the user and the engine. The
//! ranking pipeline never reads it; it exists for the presentation layer and
//! for session persistence.

use crate::error::{RecoError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Who produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single conversation entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only conversation history for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistory {
    /// Session identifier
    pub id: Uuid,
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
        }
    }

    /// Append a message
    pub fn add(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// All messages in insertion order
    pub fn get(&self) -> &[Message] {
        &self.messages
    }

    /// Remove all messages; the session id is kept
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Persist the history as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RecoError::Io {
                source: e,
                context: format!("Failed to create history directory: {}", parent.display()),
            })?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| RecoError::Json {
            source: e,
            context: "Failed to serialize chat history".to_string(),
        })?;

        std::fs::write(path, content).map_err(|e| RecoError::Io {
            source: e,
            context: format!("Failed to write history file: {}", path.display()),
        })
    }

    /// Load a previously saved history
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RecoError::Io {
            source: e,
            context: format!("Failed to read history file: {}", path.display()),
        })?;

        serde_json::from_str(&content).map_err(|e| RecoError::Json {
            source: e,
            context: "Failed to parse chat history".to_string(),
        })
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}
