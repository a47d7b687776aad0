//! Application state
//!
//! Wires configuration into concrete collaborators and hands the assembled
//! workflow to the handlers. Everything is constructed here and injected by
//! reference; there are no module-level singletons.

use std::sync::Arc;
use std::time::Duration;

use lead_agent_agent::{QualificationWorkflow, WorkflowConfig};
use lead_agent_config::Settings;
use lead_agent_core::{ConversationLog, LeadStore, Notifier, Responder};
use lead_agent_llm::{
    ClaudeBackend, ClaudeConfig, LlmBackend, LlmConfig, OllamaBackend, PromptBuilder,
    TieredResponder,
};
use lead_agent_notify::{
    ResendConfig, ResendMailer, SalesNotifier, SimulatedNotifier, TwilioClient, TwilioConfig,
};
use lead_agent_persistence::{InMemoryStore, SupabaseConfig, SupabaseStore};

use crate::session::SessionManager;
use crate::ServerError;

/// Brand the responder persona speaks for.
const COMPANY_NAME: &str = "Everest View Property";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    pub workflow: Arc<QualificationWorkflow>,
}

impl AppState {
    /// Assemble collaborators from settings and build the workflow.
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let responder = build_responder(&config)?;
        let (leads, conversations) = build_stores(&config)?;
        let notifier = build_notifier(&config)?;

        let workflow = QualificationWorkflow::new(
            WorkflowConfig {
                responder_timeout: Duration::from_secs(config.routing.responder_timeout_secs),
                stagnation_threshold: config.routing.stagnation_threshold,
                needs_review_after: config.routing.needs_review_after,
            },
            responder,
            leads,
            conversations,
            notifier,
        );

        let sessions = SessionManager::new(
            config.server.max_sessions,
            Duration::from_secs(config.server.session_timeout_secs),
        );

        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            workflow: Arc::new(workflow),
        })
    }
}

fn build_responder(config: &Settings) -> Result<Arc<dyn Responder>, ServerError> {
    let local = OllamaBackend::new(LlmConfig {
        model: config.llm.local_model.clone(),
        endpoint: config.llm.local_endpoint.clone(),
        api_key: None,
        max_tokens: config.llm.max_tokens,
        temperature: config.llm.temperature,
        timeout: Duration::from_secs(config.llm.timeout_secs),
        max_retries: config.llm.max_retries,
        initial_backoff: Duration::from_millis(100),
    })
    .map_err(|e| ServerError::Init(e.to_string()))?;

    // Cloud tier is optional: without a key, escalated turns use the local
    // model
    let api_key = config
        .llm
        .cloud_api_key
        .clone()
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
        .unwrap_or_default();

    let cloud: Option<Box<dyn LlmBackend>> = if api_key.is_empty() {
        tracing::warn!("No Anthropic API key configured; cloud tier disabled");
        None
    } else {
        let backend = ClaudeBackend::new(
            ClaudeConfig::new(api_key)
                .with_model(config.llm.cloud_model.clone())
                .with_max_tokens(config.llm.max_tokens)
                .with_temperature(config.llm.temperature),
        )
        .map_err(|e| ServerError::Init(e.to_string()))?;
        Some(Box::new(backend))
    };

    Ok(Arc::new(TieredResponder::new(
        Box::new(local),
        cloud,
        PromptBuilder::new(COMPANY_NAME),
    )))
}

fn build_stores(
    config: &Settings,
) -> Result<(Arc<dyn LeadStore>, Arc<dyn ConversationLog>), ServerError> {
    if config.persistence.enabled && config.persistence.has_supabase() {
        let store = SupabaseStore::new(SupabaseConfig::new(
            config.persistence.supabase_url.clone().unwrap_or_default(),
            config.persistence.supabase_key.clone().unwrap_or_default(),
        ))
        .map_err(|e| ServerError::Init(e.to_string()))?;

        tracing::info!("Supabase persistence enabled");
        let store = Arc::new(store);
        Ok((store.clone(), store))
    } else {
        tracing::info!("Persistence disabled, using in-memory store");
        let store = Arc::new(InMemoryStore::new());
        Ok((store.clone(), store))
    }
}

fn build_notifier(config: &Settings) -> Result<Arc<dyn Notifier>, ServerError> {
    let n = &config.notifications;

    if n.simulate {
        tracing::info!("Notifications simulated (logged, not sent)");
        return Ok(Arc::new(SimulatedNotifier::new()));
    }

    let twilio = if n.has_twilio() {
        Some(
            TwilioClient::new(TwilioConfig::new(
                n.twilio_account_sid.clone().unwrap_or_default(),
                n.twilio_auth_token.clone().unwrap_or_default(),
                n.twilio_from_number.clone().unwrap_or_default(),
            ))
            .map_err(|e| ServerError::Init(e.to_string()))?,
        )
    } else {
        tracing::warn!("Twilio not configured; SMS and calls will be mocked");
        None
    };

    let mailer = if n.has_resend() {
        Some(
            ResendMailer::new(ResendConfig::new(
                n.resend_api_key.clone().unwrap_or_default(),
            ))
            .map_err(|e| ServerError::Init(e.to_string()))?,
        )
    } else {
        tracing::warn!("Resend not configured; emails will be mocked");
        None
    };

    Ok(Arc::new(SalesNotifier::new(
        twilio,
        mailer,
        n.sales_team_phone.clone(),
        n.sales_team_email.clone(),
        n.email_from.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_default_settings() {
        let state = AppState::from_settings(Settings::default()).unwrap();
        assert_eq!(state.sessions.count(), 0);
    }
}
