//! Conversation types: messages, qualification status, per-session state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::LeadProfile;

/// Role in a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message in the conversation. Immutable once created; the
/// transcript is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Coarse stage of a lead's readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationStatus {
    /// Session just created, nothing known yet
    #[default]
    Initial,
    /// Some interest signals captured, not enough to hand over
    Discovery,
    /// Contact info plus concrete interest; ready for the sales team
    Qualified,
    /// Flagged by the workflow after repeated stagnation without qualifying
    NeedsReview,
}

impl QualificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualificationStatus::Initial => "INITIAL",
            QualificationStatus::Discovery => "DISCOVERY",
            QualificationStatus::Qualified => "QUALIFIED",
            QualificationStatus::NeedsReview => "NEEDS_REVIEW",
        }
    }
}

impl std::fmt::Display for QualificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response-generation model class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap local model, the default
    #[default]
    Local,
    /// Stronger cloud model for complex topics or stalled conversations
    Cloud,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Local => "local",
            ModelTier::Cloud => "cloud",
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable per-session state. Owned by the workflow for the duration of one
/// turn; the caller is the durable owner between turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: String,
    pub user_id: String,
    pub messages: Vec<ConversationMessage>,
    pub profile: LeadProfile,
    pub status: QualificationStatus,
    /// Consecutive turns without a qualification-status change
    pub attempts: u32,
    pub language: String,
    pub last_tier: ModelTier,
}

impl ConversationState {
    pub fn new(session_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            messages: Vec::new(),
            profile: LeadProfile::default(),
            status: QualificationStatus::Initial,
            attempts: 0,
            language: "en".to_string(),
            last_tier: ModelTier::Local,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::assistant(content));
    }

    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }
}

/// Outcome of one workflow turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    pub reply: String,
    pub profile: LeadProfile,
    pub status: QualificationStatus,
    pub score: i32,
    pub tier: ModelTier,
    pub attempts: u32,
}
