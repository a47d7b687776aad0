//! HTTP server for the lead qualification agent

pub mod http;
pub mod session;
pub mod state;

pub use http::create_router;
pub use session::{ChatSession, SessionManager};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Initialization error: {0}")]
    Init(String),
}
