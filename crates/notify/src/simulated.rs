//! Simulated notifier
//!
//! Records every notification instead of sending it. Used when
//! `notifications.simulate` is on and as a double in workflow tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use lead_agent_core::{LeadProfile, Notifier, Result};

use crate::sales::SalesNotifier;

/// A recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedEvent {
    Sms { body: String },
    Email { session_id: String, subject: String },
    Call,
}

/// Notifier that records events in memory and logs them.
#[derive(Default)]
pub struct SimulatedNotifier {
    events: Mutex<Vec<SimulatedEvent>>,
}

impl SimulatedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SimulatedEvent> {
        self.events.lock().clone()
    }

    pub fn sms_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, SimulatedEvent::Sms { .. }))
            .count()
    }

    pub fn call_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, SimulatedEvent::Call))
            .count()
    }
}

#[async_trait]
impl Notifier for SimulatedNotifier {
    async fn send_sms(&self, profile: &LeadProfile) -> Result<()> {
        let body = SalesNotifier::format_sms(profile);
        tracing::info!(body = %body, "SMS simulated");
        self.events.lock().push(SimulatedEvent::Sms { body });
        Ok(())
    }

    async fn send_email(&self, profile: &LeadProfile, session_id: &str) -> Result<()> {
        let subject = SalesNotifier::format_email_subject(profile);
        tracing::info!(session_id = %session_id, subject = %subject, "Email simulated");
        self.events.lock().push(SimulatedEvent::Email {
            session_id: session_id.to_string(),
            subject,
        });
        Ok(())
    }

    async fn trigger_call(&self) -> Result<()> {
        tracing::info!("Call simulated");
        self.events.lock().push(SimulatedEvent::Call);
        Ok(())
    }
}
