//! Rule-based profile extraction from user messages
//!
//! Implements keyword and regex heuristics over free-form chat text. Rules
//! are independent, run in a fixed order on every message, and overwrite the
//! field they govern on a match. A rule that finds nothing leaves its field
//! untouched, so populated fields are never cleared.

use regex::Regex;

use lead_agent_core::LeadProfile;

/// Urban location gazetteer. Iteration order matters: the last entry found
/// in the message wins.
const LOCATIONS: &[&str] = &[
    "Downtown",
    "Uptown",
    "Marina",
    "Business District",
    "Suburbs",
    "City Center",
    "Beachfront",
    "Hills",
    "Valley",
    "Lakeside",
];

const PROPERTY_TYPES: &[&str] = &["Apartment", "Villa", "Townhouse", "Land", "Penthouse"];

const URGENCY_CUES: &[&str] = &["asap", "urgent", "now", "this month", "immediate"];

const CURRENCY_CUES: &[&str] = &[
    "$", "£", "€", "dollars", "pounds", "euros", "budget", "price", "cost",
];

/// Words that the name patterns must not accept as a captured name.
const FORBIDDEN_NAMES: &[&str] = &["looking", "interested", "searching", "buying", "selling"];

/// Extracts lead facts from a single user message.
pub struct ProfileExtractor {
    numeric_token: Regex,
    magnitude_cue: Regex,
    bedrooms: Regex,
    email: Regex,
    phone: Regex,
    name_patterns: Vec<Regex>,
}

impl ProfileExtractor {
    pub fn new() -> Self {
        Self {
            numeric_token: Regex::new(r"\d+(?:[.,]\d+)?[mk]?").unwrap(),
            magnitude_cue: Regex::new(r"\d+\s*(?:m|million|k|thousand)").unwrap(),
            bedrooms: Regex::new(r"(\d+)\s*(?:br|bed|room)").unwrap(),
            email: Regex::new(r"[\w.\-]+@[\w.\-]+\.\w+").unwrap(),
            phone: Regex::new(r"(?:\+|00)?(?:\d[\s-]?){9,14}").unwrap(),
            name_patterns: vec![
                Regex::new(r"(?i)my name is ([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)").unwrap(),
                Regex::new(r"(?i)i am ([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)").unwrap(),
                Regex::new(r"(?i)call me ([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)").unwrap(),
            ],
        }
    }

    /// Apply every heuristic to `message`, updating `profile` in place.
    /// Never fails; a rule without a match is a no-op for its field.
    pub fn apply(&self, message: &str, profile: &mut LeadProfile) {
        let lower = message.to_lowercase();

        // 1. Investment type; off-plan takes priority when both appear
        if lower.contains("off-plan") || lower.contains("off plan") {
            profile.investment_type = Some("Off-plan".to_string());
        } else if lower.contains("ready") || lower.contains("secondary") || lower.contains("move in")
        {
            profile.investment_type = Some("Ready/Secondary".to_string());
        }

        // 2. Budget: numeric token + currency cue + magnitude cue, stored as
        // the raw message rather than a normalized number
        if self.numeric_token.is_match(&lower)
            && CURRENCY_CUES.iter().any(|cue| lower.contains(cue))
            && (self.magnitude_cue.is_match(&lower)
                || lower.contains('$')
                || lower.contains('€')
                || lower.contains('£'))
        {
            profile.budget_range = Some(message.to_string());
        }

        // 3. Property type; last match in list order wins
        for p_type in PROPERTY_TYPES {
            if lower.contains(&p_type.to_lowercase()) {
                profile.property_type = Some(p_type.to_string());
            }
        }

        // 4. Bedrooms; "studio" wins outright
        if lower.contains("studio") {
            profile.bedrooms = Some("Studio".to_string());
        } else if let Some(caps) = self.bedrooms.captures(&lower) {
            profile.bedrooms = Some(format!("{} Bedroom(s)", &caps[1]));
        }

        // 5. Location; last match in gazetteer order wins
        for location in LOCATIONS {
            if lower.contains(&location.to_lowercase()) {
                profile.target_location = Some(location.to_string());
            }
        }

        // 6. Urgency; "High" is the only level produced
        if URGENCY_CUES.iter().any(|cue| lower.contains(cue)) {
            profile.urgency = Some("High".to_string());
        }

        // 7. Any Arabic-range character forces the language preference
        if message.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)) {
            profile.language_preference = "ar".to_string();
        }

        // 8. Email
        if let Some(m) = self.email.find(message) {
            profile.email = Some(m.as_str().to_string());
        }

        // 9. Phone; accepted only when at least nine digits are present
        if let Some(m) = self.phone.find(message) {
            let digit_count = m.as_str().chars().filter(|c| c.is_ascii_digit()).count();
            if digit_count >= 9 {
                profile.phone_number = Some(m.as_str().trim().to_string());
            }
        }

        // 10. Name; first accepted (non-forbidden) pattern match wins
        for pattern in &self.name_patterns {
            if let Some(caps) = pattern.captures(message) {
                let candidate = &caps[1];
                if !FORBIDDEN_NAMES.contains(&candidate.to_lowercase().as_str()) {
                    profile.name = Some(title_case(candidate));
                    break;
                }
            }
        }
    }
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(message: &str) -> LeadProfile {
        let extractor = ProfileExtractor::new();
        let mut profile = LeadProfile::default();
        extractor.apply(message, &mut profile);
        profile
    }

    #[test]
    fn test_investment_type_off_plan_priority() {
        let profile = extract("I want an off-plan unit, not a ready one");
        assert_eq!(profile.investment_type.as_deref(), Some("Off-plan"));

        let profile = extract("something ready to move in");
        assert_eq!(profile.investment_type.as_deref(), Some("Ready/Secondary"));

        let profile = extract("off plan please");
        assert_eq!(profile.investment_type.as_deref(), Some("Off-plan"));
    }

    #[test]
    fn test_budget_requires_currency_and_magnitude() {
        // Number alone is not a budget
        let profile = extract("I have 3 kids");
        assert!(profile.budget_range.is_none());

        // Currency cue without a magnitude cue or symbol is not enough
        let profile = extract("my budget is flexible around 7");
        assert!(profile.budget_range.is_none());

        // Symbol satisfies both the currency and magnitude requirements
        let profile = extract("around $750,000 total");
        assert_eq!(profile.budget_range.as_deref(), Some("around $750,000 total"));

        // Word-based cues
        let profile = extract("budget of 2 million");
        assert_eq!(profile.budget_range.as_deref(), Some("budget of 2 million"));
    }

    #[test]
    fn test_budget_stores_raw_message() {
        let msg = "My budget is $1.5m for this";
        let profile = extract(msg);
        assert_eq!(profile.budget_range.as_deref(), Some(msg));
    }

    #[test]
    fn test_property_type_last_listed_wins() {
        let profile = extract("not sure between an apartment and a villa");
        // Villa comes after Apartment in list order
        assert_eq!(profile.property_type.as_deref(), Some("Villa"));

        let profile = extract("a penthouse maybe, or an apartment");
        assert_eq!(profile.property_type.as_deref(), Some("Penthouse"));
    }

    #[test]
    fn test_bedrooms_studio_wins() {
        let profile = extract("a studio or 2 bedroom");
        assert_eq!(profile.bedrooms.as_deref(), Some("Studio"));

        let profile = extract("looking for 3br");
        assert_eq!(profile.bedrooms.as_deref(), Some("3 Bedroom(s)"));

        let profile = extract("2 beds would be fine");
        assert_eq!(profile.bedrooms.as_deref(), Some("2 Bedroom(s)"));
    }

    #[test]
    fn test_location_last_match_wins() {
        let profile = extract("either Downtown or the Marina");
        assert_eq!(profile.target_location.as_deref(), Some("Marina"));

        let profile = extract("somewhere in the business district");
        assert_eq!(profile.target_location.as_deref(), Some("Business District"));
    }

    #[test]
    fn test_urgency_cues() {
        let profile = extract("I need this asap");
        assert_eq!(profile.urgency.as_deref(), Some("High"));

        let profile = extract("hoping to close this month");
        assert_eq!(profile.urgency.as_deref(), Some("High"));

        let profile = extract("no rush at all");
        assert!(profile.urgency.is_none());
    }

    #[test]
    fn test_arabic_overrides_language() {
        let profile = extract("مرحبا I want a villa");
        assert_eq!(profile.language_preference, "ar");
        assert_eq!(profile.property_type.as_deref(), Some("Villa"));

        let profile = extract("hello");
        assert_eq!(profile.language_preference, "en");
    }

    #[test]
    fn test_email_extraction() {
        let profile = extract("reach me at john.smith@example.com thanks");
        assert_eq!(profile.email.as_deref(), Some("john.smith@example.com"));
    }

    #[test]
    fn test_phone_extraction() {
        let profile = extract("call me on +971501234567");
        assert_eq!(profile.phone_number.as_deref(), Some("+971501234567"));

        let profile = extract("my number is 050 123 4567");
        assert!(profile.phone_number.is_some());

        // Too few digits
        let profile = extract("I am 35 years old, flat 1204");
        assert!(profile.phone_number.is_none());
    }

    #[test]
    fn test_name_extraction_and_title_case() {
        let profile = extract("My name is John Smith");
        assert_eq!(profile.name.as_deref(), Some("John Smith"));

        // Case-insensitive patterns still title-case the result
        let profile = extract("my name is sarah");
        assert_eq!(profile.name.as_deref(), Some("Sarah"));

        let profile = extract("call me Ahmed");
        assert_eq!(profile.name.as_deref(), Some("Ahmed"));
    }

    #[test]
    fn test_name_forbidden_words_skipped() {
        // "i am looking" must not set a name; the later pattern still can
        let profile = extract("I am looking for a villa, call me David");
        assert_eq!(profile.name.as_deref(), Some("David"));

        let profile = extract("I am interested in penthouses");
        assert!(profile.name.is_none());
    }

    #[test]
    fn test_no_match_leaves_fields_untouched() {
        let extractor = ProfileExtractor::new();
        let mut profile = LeadProfile::default();
        profile.name = Some("Jane Doe".to_string());
        profile.target_location = Some("Hills".to_string());

        extractor.apply("ok thanks", &mut profile);
        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
        assert_eq!(profile.target_location.as_deref(), Some("Hills"));
    }

    #[test]
    fn test_idempotent_for_informationless_message() {
        let extractor = ProfileExtractor::new();
        let mut profile = LeadProfile::default();
        extractor.apply("2 bedroom villa in Downtown", &mut profile);
        let snapshot = profile.clone();

        extractor.apply("2 bedroom villa in Downtown", &mut profile);
        assert_eq!(profile, snapshot);
    }

    #[test]
    fn test_combined_scenario_message() {
        let profile =
            extract("I'm looking for an off-plan apartment, 2 bedrooms in Downtown, budget $500k");
        assert_eq!(profile.investment_type.as_deref(), Some("Off-plan"));
        assert_eq!(profile.property_type.as_deref(), Some("Apartment"));
        assert_eq!(profile.bedrooms.as_deref(), Some("2 Bedroom(s)"));
        assert_eq!(profile.target_location.as_deref(), Some("Downtown"));
        assert!(profile.budget_range.is_some());
    }
}
