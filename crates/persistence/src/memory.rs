//! In-memory store for development and tests
//!
//! Used when Supabase persistence is disabled; conversations and leads live
//! only as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use lead_agent_core::{ConversationLog, ConversationMessage, LeadProfile, LeadStore, Result};

/// Stored lead record
#[derive(Debug, Clone)]
pub struct LeadRecord {
    pub profile: LeadProfile,
    pub score: i32,
}

/// In-memory lead and conversation store
#[derive(Default)]
pub struct InMemoryStore {
    leads: Mutex<HashMap<String, LeadRecord>>,
    conversations: Mutex<HashMap<String, Vec<ConversationMessage>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_lead(&self, session_id: &str) -> Option<LeadRecord> {
        self.leads.lock().get(session_id).cloned()
    }

    pub fn get_conversation(&self, session_id: &str) -> Option<Vec<ConversationMessage>> {
        self.conversations.lock().get(session_id).cloned()
    }

    pub fn lead_count(&self) -> usize {
        self.leads.lock().len()
    }
}

#[async_trait]
impl LeadStore for InMemoryStore {
    async fn upsert_lead(&self, session_id: &str, profile: &LeadProfile, score: i32) -> Result<()> {
        self.leads.lock().insert(
            session_id.to_string(),
            LeadRecord {
                profile: profile.clone(),
                score,
            },
        );
        tracing::debug!(session_id = %session_id, score, "Lead upserted (in-memory)");
        Ok(())
    }
}

#[async_trait]
impl ConversationLog for InMemoryStore {
    async fn log_conversation(
        &self,
        session_id: &str,
        messages: &[ConversationMessage],
    ) -> Result<()> {
        self.conversations
            .lock()
            .insert(session_id.to_string(), messages.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_lead() {
        let store = InMemoryStore::new();
        let profile = LeadProfile::default();

        store.upsert_lead("s1", &profile, 10).await.unwrap();
        store.upsert_lead("s1", &profile, 50).await.unwrap();

        assert_eq!(store.lead_count(), 1);
        assert_eq!(store.get_lead("s1").unwrap().score, 50);
    }

    #[tokio::test]
    async fn test_log_conversation_overwrites_transcript() {
        let store = InMemoryStore::new();
        let messages = vec![
            ConversationMessage::user("hi"),
            ConversationMessage::assistant("hello"),
        ];

        store.log_conversation("s1", &messages).await.unwrap();
        assert_eq!(store.get_conversation("s1").unwrap().len(), 2);

        let longer = vec![
            ConversationMessage::user("hi"),
            ConversationMessage::assistant("hello"),
            ConversationMessage::user("looking for a villa"),
        ];
        store.log_conversation("s1", &longer).await.unwrap();
        assert_eq!(store.get_conversation("s1").unwrap().len(), 3);
    }
}
