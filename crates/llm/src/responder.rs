//! Tiered Responder implementation
//!
//! Bridges the LLM backends to the core `Responder` trait. The routed model
//! tier picks the backend; any backend failure degrades to a fixed apology
//! reply so the rest of the turn pipeline is never blocked by the model call.

use async_trait::async_trait;

use lead_agent_core::{ConversationState, ModelTier, Responder, APOLOGY_REPLY};

use crate::backend::LlmBackend;
use crate::prompt::PromptBuilder;

/// Responder that selects a backend per routed tier.
///
/// The cloud backend is optional; when absent (no API key configured),
/// escalated turns fall back to the local backend.
pub struct TieredResponder {
    local: Box<dyn LlmBackend>,
    cloud: Option<Box<dyn LlmBackend>>,
    prompt: PromptBuilder,
}

impl TieredResponder {
    pub fn new(
        local: Box<dyn LlmBackend>,
        cloud: Option<Box<dyn LlmBackend>>,
        prompt: PromptBuilder,
    ) -> Self {
        Self {
            local,
            cloud,
            prompt,
        }
    }

    fn backend_for(&self, tier: ModelTier) -> &dyn LlmBackend {
        match tier {
            ModelTier::Cloud => match &self.cloud {
                Some(cloud) => cloud.as_ref(),
                None => {
                    tracing::warn!("Cloud tier requested but not configured, using local model");
                    self.local.as_ref()
                }
            },
            ModelTier::Local => self.local.as_ref(),
        }
    }
}

#[async_trait]
impl Responder for TieredResponder {
    async fn generate(
        &self,
        state: &ConversationState,
        user_message: &str,
        tier: ModelTier,
    ) -> String {
        let messages = self.prompt.build(state, user_message);
        let backend = self.backend_for(tier);

        match backend.generate(&messages).await {
            Ok(result) => {
                tracing::debug!(
                    model = %backend.model_name(),
                    tier = %tier,
                    tokens = result.tokens,
                    total_time_ms = result.total_time_ms,
                    "Generated reply"
                );
                result.text
            }
            Err(e) => {
                tracing::warn!(
                    model = %backend.model_name(),
                    tier = %tier,
                    error = %e,
                    "LLM call failed, degrading to apology reply"
                );
                APOLOGY_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerationResult;
    use crate::LlmError;

    struct FailingBackend;

    #[async_trait]
    impl LlmBackend for FailingBackend {
        async fn generate(
            &self,
            _messages: &[crate::prompt::Message],
        ) -> Result<GenerationResult, LlmError> {
            Err(LlmError::Network("connection refused".to_string()))
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    struct EchoBackend;

    #[async_trait]
    impl LlmBackend for EchoBackend {
        async fn generate(
            &self,
            messages: &[crate::prompt::Message],
        ) -> Result<GenerationResult, LlmError> {
            Ok(GenerationResult {
                text: format!("echo:{}", messages.last().unwrap().content),
                tokens: 1,
                total_time_ms: 1,
            })
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_failure_degrades_to_apology() {
        let responder = TieredResponder::new(Box::new(FailingBackend), None, PromptBuilder::default());
        let state = ConversationState::new("s1", "u1");

        let reply = responder.generate(&state, "hello", ModelTier::Local).await;
        assert_eq!(reply, APOLOGY_REPLY);
    }

    #[tokio::test]
    async fn test_cloud_tier_falls_back_to_local_when_unconfigured() {
        let responder = TieredResponder::new(Box::new(EchoBackend), None, PromptBuilder::default());
        let state = ConversationState::new("s1", "u1");

        let reply = responder.generate(&state, "hello", ModelTier::Cloud).await;
        assert_eq!(reply, "echo:hello");
    }

    #[tokio::test]
    async fn test_cloud_tier_uses_cloud_backend() {
        let responder = TieredResponder::new(
            Box::new(FailingBackend),
            Some(Box::new(EchoBackend)),
            PromptBuilder::default(),
        );
        let state = ConversationState::new("s1", "u1");

        let reply = responder.generate(&state, "mortgage advice", ModelTier::Cloud).await;
        assert_eq!(reply, "echo:mortgage advice");

        // Local tier hits the failing local backend and degrades
        let reply = responder.generate(&state, "hi", ModelTier::Local).await;
        assert_eq!(reply, APOLOGY_REPLY);
    }
}
