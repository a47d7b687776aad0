//! Resend client for email delivery

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::NotifyError;

/// Resend configuration
#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    /// API endpoint (for testing or proxy)
    pub endpoint: String,
    pub timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Minimal Resend REST client
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    config: ResendConfig,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Result<Self, NotifyError> {
        if config.api_key.is_empty() {
            return Err(NotifyError::Configuration(
                "Resend API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Send an HTML email.
    pub async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), NotifyError> {
        let request = EmailRequest {
            from,
            to,
            subject,
            html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.endpoint))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider(format!("HTTP {}: {}", status, body)));
        }

        tracing::info!(to = %to, subject = %subject, "Email sent via Resend");
        Ok(())
    }
}
