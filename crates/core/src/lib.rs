//! Core types and traits for the lead qualification agent
//!
//! This crate provides the foundational types used across all other crates:
//! - Lead profile and conversation/session types
//! - Qualification status and model tier enums
//! - Collaborator traits (Responder, LeadStore, ConversationLog, Notifier)
//! - Error types

pub mod conversation;
pub mod error;
pub mod profile;
pub mod traits;

pub use conversation::{
    ConversationMessage, ConversationState, MessageRole, ModelTier, QualificationStatus,
    TurnResult,
};
pub use error::{Error, Result};
pub use profile::LeadProfile;
pub use traits::{ConversationLog, LeadStore, Notifier, Responder, APOLOGY_REPLY};
