//! Lead profile accumulated across a conversation

use serde::{Deserialize, Serialize};

/// Structured facts extracted from a lead's messages.
///
/// Fields are only ever set to a non-empty value or left untouched; no
/// heuristic clears a previously populated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadProfile {
    /// Off-plan or Ready/Secondary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_type: Option<String>,
    /// Raw message text that carried the budget, not a normalized number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    /// Apartment, Villa, Townhouse, Land, Penthouse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// "Studio" or "<n> Bedroom(s)"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_location: Option<String>,
    /// Only "High" is ever produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_language")]
    pub language_preference: String,
    #[serde(default)]
    pub lead_score: i32,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for LeadProfile {
    fn default() -> Self {
        Self {
            investment_type: None,
            budget_range: None,
            property_type: None,
            bedrooms: None,
            target_location: None,
            urgency: None,
            name: None,
            phone_number: None,
            email: None,
            language_preference: default_language(),
            lead_score: 0,
        }
    }
}

impl LeadProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five fields the qualification flow tries to fill.
    pub fn core_fields(&self) -> [&Option<String>; 5] {
        [
            &self.investment_type,
            &self.budget_range,
            &self.property_type,
            &self.bedrooms,
            &self.target_location,
        ]
    }

    /// Contact channels the sales team can follow up on.
    pub fn contact_fields(&self) -> [&Option<String>; 3] {
        [&self.name, &self.phone_number, &self.email]
    }

    /// Count of populated core fields.
    pub fn filled_core_count(&self) -> usize {
        self.core_fields().iter().filter(|f| f.is_some()).count()
    }

    /// Name and phone number are both known.
    pub fn has_contact(&self) -> bool {
        self.name.is_some() && self.phone_number.is_some()
    }

    /// One-line summary for SMS/log output.
    pub fn summary_line(&self) -> String {
        format!(
            "{} ({}). Budget: {}. Location: {}. Score: {}",
            self.name.as_deref().unwrap_or("Unknown"),
            self.phone_number.as_deref().unwrap_or("No Phone"),
            self.budget_range.as_deref().unwrap_or("Unknown"),
            self.target_location.as_deref().unwrap_or("Unknown"),
            self.lead_score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let profile = LeadProfile::default();
        assert_eq!(profile.language_preference, "en");
        assert_eq!(profile.lead_score, 0);
        assert_eq!(profile.filled_core_count(), 0);
        assert!(!profile.has_contact());
    }

    #[test]
    fn test_filled_core_count() {
        let mut profile = LeadProfile::default();
        profile.property_type = Some("Villa".to_string());
        profile.target_location = Some("Marina".to_string());
        assert_eq!(profile.filled_core_count(), 2);
    }

    #[test]
    fn test_summary_line_placeholders() {
        let profile = LeadProfile::default();
        let line = profile.summary_line();
        assert!(line.contains("Unknown"));
        assert!(line.contains("No Phone"));
    }
}
