//! Prompt construction for the qualification specialist persona

use serde::{Deserialize, Serialize};

use lead_agent_core::{ConversationState, LeadProfile, MessageRole};

/// Role in an LLM message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in an LLM request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Builds the system prompt and message history for a turn.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    /// Brand name inserted into the persona prompt
    pub company_name: String,
}

impl PromptBuilder {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
        }
    }

    /// Full message list for one turn: system prompt, prior history, then the
    /// current user message.
    pub fn build(&self, state: &ConversationState, user_message: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(state.messages.len() + 2);
        messages.push(Message::system(
            self.system_prompt(&state.profile, &state.language),
        ));

        for msg in &state.messages {
            messages.push(match msg.role {
                MessageRole::User => Message::user(msg.content.clone()),
                MessageRole::Assistant => Message::assistant(msg.content.clone()),
            });
        }

        messages.push(Message::user(user_message));
        messages
    }

    /// Persona prompt with the current profile state appended so the model
    /// knows which fields are still missing.
    pub fn system_prompt(&self, profile: &LeadProfile, language: &str) -> String {
        let company = if self.company_name.is_empty() {
            "the agency"
        } else {
            &self.company_name
        };

        let base = format!(
            "You are a highly professional, polite, and data-driven Real Estate \
             Lead Qualification Specialist, representing **{company}**.\n\
             You focus exclusively on **SALES** transactions (not leasing).\n\n\
             Your goal is to QUALIFY the user by collecting these five mandatory fields:\n\n\
             1. Investment Type - Off-plan or Ready/Secondary\n\
             2. Budget - Specific range (including currency, e.g., $500k-$1M)\n\
             3. Property Type - Apartment, Villa, Townhouse, or Land\n\
             4. Bedrooms - Studio, 1, 2, 3+\n\
             5. Target Location - Specific area or neighborhood\n\n\
             **Rules of Engagement**\n\
             1. **IMPORTANT**: You MUST reply in the requested language: **{language}**.\n\
             2. **BREVITY**: Keep responses SHORT, CRISP, and CONCISE. Max 2 sentences \
             where possible. Avoid fluff.\n\
             3. If user asks about rentals or unrelated topics, politely redirect to \
             finding a home/investment for sale.\n\
             4. Ask for one missing field at a time.\n\
             5. After each answer, confirm briefly and move to the next missing field.\n\
             6. When all five are filled, mark lead as QUALIFIED and end with a summary.",
        );

        let profile_state = format!(
            "Current Lead Profile State:\n\
             - Investment Type: {}\n\
             - Budget: {}\n\
             - Property Type: {}\n\
             - Bedrooms: {}\n\
             - Location: {}\n\
             - Language Preference: {}",
            profile.investment_type.as_deref().unwrap_or("Unknown"),
            profile.budget_range.as_deref().unwrap_or("Unknown"),
            profile.property_type.as_deref().unwrap_or("Unknown"),
            profile.bedrooms.as_deref().unwrap_or("Unknown"),
            profile.target_location.as_deref().unwrap_or("Unknown"),
            language,
        );

        format!("{}\n\n{}", base, profile_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_agent_core::ConversationState;

    #[test]
    fn test_system_prompt_reflects_profile() {
        let builder = PromptBuilder::new("Everest View Property");
        let mut profile = LeadProfile::default();
        profile.property_type = Some("Villa".to_string());

        let prompt = builder.system_prompt(&profile, "en");
        assert!(prompt.contains("Everest View Property"));
        assert!(prompt.contains("- Property Type: Villa"));
        assert!(prompt.contains("- Budget: Unknown"));
        assert!(prompt.contains("requested language: **en**"));
    }

    #[test]
    fn test_build_orders_history_before_current_message() {
        let builder = PromptBuilder::new("Everest View Property");
        let mut state = ConversationState::new("s1", "u1");
        state.push_user("hi");
        state.push_assistant("hello, how can I help?");

        let messages = builder.build(&state, "looking for a villa");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, "looking for a villa");
    }
}
