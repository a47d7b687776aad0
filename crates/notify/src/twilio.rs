//! Twilio client for SMS and outbound voice calls

use std::time::Duration;

use reqwest::Client;

use crate::NotifyError;

/// Twilio account configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 format
    pub from_number: String,
    /// API endpoint (for testing or proxy)
    pub endpoint: String,
    pub timeout: Duration,
}

impl TwilioConfig {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            endpoint: "https://api.twilio.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Minimal Twilio REST client
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    config: TwilioConfig,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Result<Self, NotifyError> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            return Err(NotifyError::Configuration(
                "Twilio account SID and auth token are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn account_url(&self, resource: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{}.json",
            self.config.endpoint, self.config.account_sid, resource
        )
    }

    async fn post_form(&self, url: &str, params: &[(&str, &str)]) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(params)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Provider(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }

    /// Send an SMS to `to`.
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        self.post_form(
            &self.account_url("Messages"),
            &[("To", to), ("From", &self.config.from_number), ("Body", body)],
        )
        .await?;

        tracing::info!(to = %to, "SMS sent via Twilio");
        Ok(())
    }

    /// Start an outbound call to `to` that speaks `twiml`.
    pub async fn start_call(&self, to: &str, twiml: &str) -> Result<(), NotifyError> {
        self.post_form(
            &self.account_url("Calls"),
            &[
                ("To", to),
                ("From", &self.config.from_number),
                ("Twiml", twiml),
            ],
        )
        .await?;

        tracing::info!(to = %to, "Call initiated via Twilio");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_rejected() {
        let config = TwilioConfig::new("", "", "+15550100");
        assert!(TwilioClient::new(config).is_err());
    }

    #[test]
    fn test_account_url() {
        let client = TwilioClient::new(TwilioConfig::new("AC123", "token", "+15550100")).unwrap();
        assert_eq!(
            client.account_url("Messages"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
