//! Supabase REST persistence
//!
//! Upserts lead records and conversation transcripts through PostgREST.
//! Both tables key on session_id; repeated writes merge into the same row.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;

use lead_agent_core::{ConversationLog, ConversationMessage, Error, LeadProfile, LeadStore, Result};

use crate::PersistenceError;

/// Supabase connection configuration
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. https://xyz.supabase.co
    pub url: String,
    /// Service role or anon key
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Lead/conversation store backed by Supabase REST
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> std::result::Result<Self, PersistenceError> {
        if config.url.is_empty() || config.api_key.is_empty() {
            return Err(PersistenceError::Configuration(
                "Supabase URL and key are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PersistenceError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}?on_conflict=session_id",
            self.config.url, table
        )
    }

    async fn upsert<T: Serialize>(
        &self,
        table: &str,
        payload: &T,
    ) -> std::result::Result<(), PersistenceError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Prefer", "resolution=merge-duplicates")
            .json(payload)
            .send()
            .await
            .map_err(|e| PersistenceError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistenceError::Write(format!(
                "{} upsert failed: HTTP {}: {}",
                table, status, body
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct LeadRow<'a> {
    session_id: &'a str,
    investment_type: Option<&'a str>,
    budget: Option<&'a str>,
    property_type: Option<&'a str>,
    bedrooms: Option<&'a str>,
    location: Option<&'a str>,
    name: Option<&'a str>,
    phone_number: Option<&'a str>,
    email: Option<&'a str>,
    language: &'a str,
    urgency: Option<&'a str>,
    score: i32,
    updated_at: String,
}

#[derive(Debug, Serialize)]
struct ConversationRow<'a> {
    session_id: &'a str,
    messages: &'a [ConversationMessage],
    updated_at: String,
}

#[async_trait]
impl LeadStore for SupabaseStore {
    async fn upsert_lead(&self, session_id: &str, profile: &LeadProfile, score: i32) -> Result<()> {
        let row = LeadRow {
            session_id,
            investment_type: profile.investment_type.as_deref(),
            budget: profile.budget_range.as_deref(),
            property_type: profile.property_type.as_deref(),
            bedrooms: profile.bedrooms.as_deref(),
            location: profile.target_location.as_deref(),
            name: profile.name.as_deref(),
            phone_number: profile.phone_number.as_deref(),
            email: profile.email.as_deref(),
            language: &profile.language_preference,
            urgency: profile.urgency.as_deref(),
            score,
            updated_at: Utc::now().to_rfc3339(),
        };

        self.upsert("leads", &row)
            .await
            .map_err(|e| Error::Persistence(e.to_string()))?;

        tracing::debug!(session_id = %session_id, score, "Lead upserted to Supabase");
        Ok(())
    }
}

#[async_trait]
impl ConversationLog for SupabaseStore {
    async fn log_conversation(
        &self,
        session_id: &str,
        messages: &[ConversationMessage],
    ) -> Result<()> {
        let row = ConversationRow {
            session_id,
            messages,
            updated_at: Utc::now().to_rfc3339(),
        };

        self.upsert("conversations", &row)
            .await
            .map_err(|e| Error::Persistence(e.to_string()))?;

        tracing::debug!(
            session_id = %session_id,
            message_count = messages.len(),
            "Conversation logged to Supabase"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_rejected() {
        let config = SupabaseConfig::new("", "");
        assert!(SupabaseStore::new(config).is_err());
    }

    #[test]
    fn test_table_url_upserts_on_session_id() {
        let store =
            SupabaseStore::new(SupabaseConfig::new("https://xyz.supabase.co", "key")).unwrap();
        assert_eq!(
            store.table_url("leads"),
            "https://xyz.supabase.co/rest/v1/leads?on_conflict=session_id"
        );
    }

    #[test]
    fn test_lead_row_serialization() {
        let mut profile = LeadProfile::default();
        profile.property_type = Some("Villa".to_string());
        profile.name = Some("John Smith".to_string());

        let row = LeadRow {
            session_id: "s1",
            investment_type: profile.investment_type.as_deref(),
            budget: profile.budget_range.as_deref(),
            property_type: profile.property_type.as_deref(),
            bedrooms: profile.bedrooms.as_deref(),
            location: profile.target_location.as_deref(),
            name: profile.name.as_deref(),
            phone_number: profile.phone_number.as_deref(),
            email: profile.email.as_deref(),
            language: &profile.language_preference,
            urgency: profile.urgency.as_deref(),
            score: 30,
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["property_type"], "Villa");
        assert_eq!(json["score"], 30);
        assert!(json["budget"].is_null());
    }
}
