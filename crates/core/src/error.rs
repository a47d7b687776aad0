//! Shared error type for collaborator boundaries

use thiserror::Error;

/// Errors surfaced at the core's collaborator seams.
///
/// Side-effect collaborators (persistence, notifications) are best-effort:
/// the workflow logs these and never fails the turn because of them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Session error: {0}")]
    Session(String),
}

pub type Result<T> = std::result::Result<T, Error>;
