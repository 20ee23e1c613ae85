use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{context::Context, error::Result};

/// Persisted per-conversation record, loaded and rewritten once per turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub id: String,
    /// Dialog the conversation is currently inside, if any
    pub active_dialog_id: Option<String>,
    /// Index of the step that will consume the next reply
    pub step_index: usize,
    /// Replies collected by the active dialog's steps
    pub collected: Context,
    /// Values extracted from intents, kept across dialogs
    pub parameters: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            active_dialog_id: None,
            step_index: 0,
            collected: Context::new(),
            parameters: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_dialog(&self) -> bool {
        self.active_dialog_id.is_some()
    }

    /// Enter a dialog at its first step, discarding whatever an earlier dialog collected
    pub fn start_dialog(&mut self, dialog_id: impl Into<String>) {
        self.active_dialog_id = Some(dialog_id.into());
        self.step_index = 0;
        self.collected = Context::new();
    }

    /// Leave the active dialog; extracted parameters are kept
    pub fn finish_dialog(&mut self) {
        self.active_dialog_id = None;
        self.step_index = 0;
        self.collected = Context::new();
    }

    /// Copy whose collected values are not shared with `self`
    pub fn detached(&self) -> Self {
        Self {
            collected: self.collected.deep_clone(),
            ..self.clone()
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Key-value persistence for conversation sessions
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn save(&self, session: ConversationSession) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<ConversationSession>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory implementation of SessionStorage.
///
/// Sessions are copied in and out, so changes made to a loaded session only
/// reach the store through `save`.
#[derive(Default)]
pub struct InMemorySessionStorage {
    sessions: Arc<DashMap<String, ConversationSession>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn save(&self, session: ConversationSession) -> Result<()> {
        self.sessions
            .insert(session.id.clone(), session.detached());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ConversationSession>> {
        Ok(self.sessions.get(id).map(|entry| entry.detached()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finishing_a_dialog_keeps_parameters() {
        let mut session = ConversationSession::new("conv-1");
        session
            .parameters
            .insert("partNumber".to_string(), "ABC123".to_string());
        session.start_dialog("login");
        session.step_index = 2;
        session.collected.set("user", "alice").await;

        session.finish_dialog();

        assert!(!session.in_dialog());
        assert_eq!(session.step_index, 0);
        assert!(session.collected.is_empty());
        assert_eq!(session.parameters["partNumber"], "ABC123");
    }

    #[tokio::test]
    async fn storage_round_trip() {
        let storage = InMemorySessionStorage::new();
        let mut session = ConversationSession::new("conv-1");
        session.start_dialog("search");

        storage.save(session).await.unwrap();
        let loaded = storage.get("conv-1").await.unwrap().unwrap();
        assert_eq!(loaded.active_dialog_id.as_deref(), Some("search"));

        storage.delete("conv-1").await.unwrap();
        assert!(storage.get("conv-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn loaded_session_changes_need_a_save() {
        let storage = InMemorySessionStorage::new();
        let mut session = ConversationSession::new("conv-1");
        session.start_dialog("login");
        storage.save(session).await.unwrap();

        let loaded = storage.get("conv-1").await.unwrap().unwrap();
        loaded.collected.set("user", "alice").await;

        let stored = storage.get("conv-1").await.unwrap().unwrap();
        assert_eq!(stored.collected.get::<String>("user").await, None);

        storage.save(loaded).await.unwrap();
        let stored = storage.get("conv-1").await.unwrap().unwrap();
        assert_eq!(
            stored.collected.get::<String>("user").await.as_deref(),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn changes_after_save_stay_local() {
        let storage = InMemorySessionStorage::new();
        let session = ConversationSession::new("conv-1");
        storage.save(session.clone()).await.unwrap();

        session.collected.set("piece", "ABC123").await;

        let stored = storage.get("conv-1").await.unwrap().unwrap();
        assert!(stored.collected.is_empty());
    }
}
