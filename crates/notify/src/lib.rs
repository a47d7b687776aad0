//! Notification delivery for hot leads
//!
//! Channels: SMS and outbound voice via Twilio, email via Resend. All
//! best-effort; the workflow logs failures and never fails a turn over a
//! notification. Without credentials every channel degrades to a logged
//! mock, and a fully simulated notifier is available for development.

pub mod resend;
pub mod sales;
pub mod simulated;
pub mod twilio;

pub use resend::{ResendConfig, ResendMailer};
pub use sales::SalesNotifier;
pub use simulated::{SimulatedEvent, SimulatedNotifier};
pub use twilio::{TwilioClient, TwilioConfig};

use thiserror::Error;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<NotifyError> for lead_agent_core::Error {
    fn from(err: NotifyError) -> Self {
        lead_agent_core::Error::Notify(err.to_string())
    }
}
