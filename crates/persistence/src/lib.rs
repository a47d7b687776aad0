//! Persistence layer for the lead qualification agent
//!
//! Provides durable storage for:
//! - Lead records (one row per session, merged on re-qualification)
//! - Conversation transcripts
//!
//! Two implementations: Supabase REST for production, in-memory for
//! development and tests. Both are best-effort from the workflow's
//! perspective; write failures are logged by the caller, never retried
//! inline.

pub mod memory;
pub mod supabase;

pub use memory::{InMemoryStore, LeadRecord};
pub use supabase::{SupabaseConfig, SupabaseStore};

use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<PersistenceError> for lead_agent_core::Error {
    fn from(err: PersistenceError) -> Self {
        lead_agent_core::Error::Persistence(err.to_string())
    }
}
