//! Sales team notifier
//!
//! Formats hot-lead alerts and delivers them through Twilio and Resend.
//! A missing provider downgrades that channel to a logged mock, mirroring
//! how the system runs without credentials in development.

use async_trait::async_trait;

use lead_agent_core::{Error, LeadProfile, Notifier, Result};

use crate::resend::ResendMailer;
use crate::twilio::TwilioClient;

/// TwiML spoken to the sales team on a qualified-lead call.
const CALL_TWIML: &str = "<Response><Say voice=\"alice\">You have a new qualified lead waiting \
     for your review. Please check the dashboard immediately.</Say></Response>";

/// Notifier that alerts the sales team over SMS, email, and voice.
pub struct SalesNotifier {
    twilio: Option<TwilioClient>,
    mailer: Option<ResendMailer>,
    sales_phone: String,
    sales_email: String,
    email_from: String,
}

impl SalesNotifier {
    pub fn new(
        twilio: Option<TwilioClient>,
        mailer: Option<ResendMailer>,
        sales_phone: impl Into<String>,
        sales_email: impl Into<String>,
        email_from: impl Into<String>,
    ) -> Self {
        Self {
            twilio,
            mailer,
            sales_phone: sales_phone.into(),
            sales_email: sales_email.into(),
            email_from: email_from.into(),
        }
    }

    /// Hot-lead SMS body.
    pub fn format_sms(profile: &LeadProfile) -> String {
        format!("HOT LEAD: {}", profile.summary_line())
    }

    /// Email subject for a qualified lead.
    pub fn format_email_subject(profile: &LeadProfile) -> String {
        format!(
            "New Qualified Lead - {} ({})",
            profile.budget_range.as_deref().unwrap_or("Unknown budget"),
            profile.target_location.as_deref().unwrap_or("Unknown area"),
        )
    }

    /// HTML profile summary for the qualified-lead email.
    pub fn format_email_body(profile: &LeadProfile, session_id: &str) -> String {
        let field = |v: &Option<String>| v.as_deref().unwrap_or("Unknown").to_string();
        format!(
            "<h2>New High-Quality Lead</h2>\
             <p><strong>Session ID:</strong> {}</p>\
             <ul>\
             <li><strong>Name:</strong> {}</li>\
             <li><strong>Phone:</strong> {}</li>\
             <li><strong>Email:</strong> {}</li>\
             <li><strong>Investment:</strong> {}</li>\
             <li><strong>Budget:</strong> {}</li>\
             <li><strong>Type:</strong> {}</li>\
             <li><strong>Bedrooms:</strong> {}</li>\
             <li><strong>Location:</strong> {}</li>\
             <li><strong>Score:</strong> {}</li>\
             </ul>\
             <p>Please contact immediately.</p>",
            session_id,
            field(&profile.name),
            field(&profile.phone_number),
            field(&profile.email),
            field(&profile.investment_type),
            field(&profile.budget_range),
            field(&profile.property_type),
            field(&profile.bedrooms),
            field(&profile.target_location),
            profile.lead_score,
        )
    }
}

#[async_trait]
impl Notifier for SalesNotifier {
    async fn send_sms(&self, profile: &LeadProfile) -> Result<()> {
        let body = Self::format_sms(profile);

        match &self.twilio {
            Some(twilio) => twilio
                .send_sms(&self.sales_phone, &body)
                .await
                .map_err(|e| Error::Notify(e.to_string())),
            None => {
                tracing::info!(to = %self.sales_phone, body = %body, "Mock SMS (Twilio not configured)");
                Ok(())
            }
        }
    }

    async fn send_email(&self, profile: &LeadProfile, session_id: &str) -> Result<()> {
        let subject = Self::format_email_subject(profile);
        let html = Self::format_email_body(profile, session_id);

        match &self.mailer {
            Some(mailer) => mailer
                .send(&self.email_from, &self.sales_email, &subject, &html)
                .await
                .map_err(|e| Error::Notify(e.to_string())),
            None => {
                tracing::info!(to = %self.sales_email, subject = %subject, "Mock email (Resend not configured)");
                Ok(())
            }
        }
    }

    async fn trigger_call(&self) -> Result<()> {
        match &self.twilio {
            Some(twilio) => twilio
                .start_call(&self.sales_phone, CALL_TWIML)
                .await
                .map_err(|e| Error::Notify(e.to_string())),
            None => {
                tracing::info!(to = %self.sales_phone, "Mock call (Twilio not configured)");
                Ok(())
            }
        }
    }
}
