//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM backend configuration (local + cloud tiers)
    #[serde(default)]
    pub llm: LlmSettings,

    /// Escalation routing knobs
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Notification provider configuration
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Lead/conversation persistence configuration
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means localhost only
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum concurrent sessions held in memory
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle seconds before a session is expired
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,
}

fn default_port() -> u16 {
    8000
}

fn default_max_sessions() -> usize {
    1000
}

fn default_session_timeout_secs() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout_secs(),
        }
    }
}

/// LLM backend configuration for both tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Local (Ollama) model name
    #[serde(default = "default_local_model")]
    pub local_model: String,

    /// Ollama endpoint
    #[serde(default = "default_local_endpoint")]
    pub local_endpoint: String,

    /// Cloud (Anthropic) model id
    #[serde(default = "default_cloud_model")]
    pub cloud_model: String,

    /// Anthropic API endpoint
    #[serde(default = "default_cloud_endpoint")]
    pub cloud_endpoint: String,

    /// Anthropic API key; falls back to ANTHROPIC_API_KEY
    #[serde(default)]
    pub cloud_api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retry attempts for transient local-backend failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_local_model() -> String {
    "phi3:mini".to_string()
}

fn default_local_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_cloud_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_cloud_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> usize {
    256
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_retries() -> u32 {
    3
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            local_model: default_local_model(),
            local_endpoint: default_local_endpoint(),
            cloud_model: default_cloud_model(),
            cloud_endpoint: default_cloud_endpoint(),
            cloud_api_key: None,
            timeout_secs: default_llm_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_retries: default_max_retries(),
        }
    }
}

/// Escalation routing knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Consecutive stagnant turns before escalating to the cloud tier
    #[serde(default = "default_stagnation_threshold")]
    pub stagnation_threshold: u32,

    /// Consecutive stagnant turns before flagging NEEDS_REVIEW
    #[serde(default = "default_needs_review_after")]
    pub needs_review_after: u32,

    /// Upper bound on the Respond step before degrading to the apology reply
    #[serde(default = "default_responder_timeout_secs")]
    pub responder_timeout_secs: u64,
}

fn default_stagnation_threshold() -> u32 {
    2
}

fn default_needs_review_after() -> u32 {
    4
}

fn default_responder_timeout_secs() -> u64 {
    20
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            stagnation_threshold: default_stagnation_threshold(),
            needs_review_after: default_needs_review_after(),
            responder_timeout_secs: default_responder_timeout_secs(),
        }
    }
}

/// Notification provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// When true, notifications are logged instead of sent
    #[serde(default = "default_simulate")]
    pub simulate: bool,

    #[serde(default)]
    pub twilio_account_sid: Option<String>,
    #[serde(default)]
    pub twilio_auth_token: Option<String>,
    #[serde(default)]
    pub twilio_from_number: Option<String>,

    #[serde(default)]
    pub resend_api_key: Option<String>,
    #[serde(default = "default_email_from")]
    pub email_from: String,

    #[serde(default)]
    pub sales_team_phone: String,
    #[serde(default)]
    pub sales_team_email: String,
}

fn default_simulate() -> bool {
    true
}

fn default_email_from() -> String {
    "AI Agent <onboarding@resend.dev>".to_string()
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            simulate: default_simulate(),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_from_number: None,
            resend_api_key: None,
            email_from: default_email_from(),
            sales_team_phone: String::new(),
            sales_team_email: String::new(),
        }
    }
}

impl NotificationsConfig {
    /// Real providers need credentials and targets; anything less runs in
    /// simulated mode.
    pub fn has_twilio(&self) -> bool {
        self.twilio_account_sid.is_some()
            && self.twilio_auth_token.is_some()
            && self.twilio_from_number.is_some()
            && !self.sales_team_phone.is_empty()
    }

    pub fn has_resend(&self) -> bool {
        self.resend_api_key.is_some() && !self.sales_team_email.is_empty()
    }
}

/// Persistence configuration (Supabase REST)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersistenceConfig {
    /// Enable Supabase persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_key: Option<String>,
}

impl PersistenceConfig {
    pub fn has_supabase(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "At least one session must be allowed".to_string(),
            });
        }

        if self.llm.timeout_secs == 0 || self.llm.timeout_secs > 300 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".to_string(),
                message: format!("Must be between 1 and 300, got {}", self.llm.timeout_secs),
            });
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if self.routing.responder_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "routing.responder_timeout_secs".to_string(),
                message: "Responder timeout must be non-zero".to_string(),
            });
        }

        if self.routing.needs_review_after <= self.routing.stagnation_threshold {
            return Err(ConfigError::InvalidValue {
                field: "routing.needs_review_after".to_string(),
                message: format!(
                    "Must exceed stagnation_threshold ({}), got {}",
                    self.routing.stagnation_threshold, self.routing.needs_review_after
                ),
            });
        }

        if self.persistence.enabled && !self.persistence.has_supabase() {
            return Err(ConfigError::MissingField(
                "persistence.supabase_url / persistence.supabase_key".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load settings from config files and environment.
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults.
/// Environment overrides use the LEAD_AGENT_ prefix with `__` separators,
/// e.g. LEAD_AGENT_SERVER__PORT=9000.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder()
        .add_source(File::with_name("config/default").required(false));

    if let Some(env) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env)).required(false));
    }

    let config = builder
        .add_source(Environment::with_prefix("LEAD_AGENT").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.routing.stagnation_threshold, 2);
        assert!(settings.notifications.simulate);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_review_threshold_must_exceed_stagnation() {
        let mut settings = Settings::default();
        settings.routing.needs_review_after = 2;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_persistence_requires_credentials() {
        let mut settings = Settings::default();
        settings.persistence.enabled = true;
        assert!(settings.validate().is_err());

        settings.persistence.supabase_url = Some("https://x.supabase.co".to_string());
        settings.persistence.supabase_key = Some("key".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_notification_provider_detection() {
        let mut n = NotificationsConfig::default();
        assert!(!n.has_twilio());
        assert!(!n.has_resend());

        n.twilio_account_sid = Some("sid".to_string());
        n.twilio_auth_token = Some("token".to_string());
        n.twilio_from_number = Some("+15550100".to_string());
        n.sales_team_phone = "+15550111".to_string();
        assert!(n.has_twilio());

        n.resend_api_key = Some("re_key".to_string());
        n.sales_team_email = "sales@example.com".to_string();
        assert!(n.has_resend());
    }
}
