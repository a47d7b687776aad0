//! Collaborator traits at the core's seams
//!
//! The decision core only needs narrow interfaces to the outside world:
//! generate a reply, read/write the lead record and transcript, and request
//! a notification. Implementations live in the llm, persistence, and notify
//! crates; tests inject recording doubles.

use async_trait::async_trait;

use crate::conversation::{ConversationMessage, ConversationState, ModelTier};
use crate::error::Result;
use crate::profile::LeadProfile;

/// Reply used whenever response generation fails or times out. Part of the
/// `Responder` contract: a degraded reply, never an error into the pipeline.
pub const APOLOGY_REPLY: &str = "I apologize, but I am having trouble connecting to my brain \
     right now. Please try again in a moment.";

/// Generates the assistant reply for a turn.
///
/// Infallible by contract: implementations catch their own transport errors
/// and return a fixed apology reply instead. A failed or degraded reply must
/// never prevent extraction from running against the user's message.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn generate(
        &self,
        state: &ConversationState,
        user_message: &str,
        tier: ModelTier,
    ) -> String;
}

/// Durable lead record storage. Best-effort; failures are logged by the
/// caller, not retried inline.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn upsert_lead(
        &self,
        session_id: &str,
        profile: &LeadProfile,
        score: i32,
    ) -> Result<()>;
}

/// Durable conversation transcript storage. Best-effort.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn log_conversation(
        &self,
        session_id: &str,
        messages: &[ConversationMessage],
    ) -> Result<()>;
}

/// Outbound notifications to the sales team. Best-effort and fire-and-forget
/// from the pipeline's perspective.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_sms(&self, profile: &LeadProfile) -> Result<()>;

    async fn send_email(&self, profile: &LeadProfile, session_id: &str) -> Result<()>;

    async fn trigger_call(&self) -> Result<()>;
}
