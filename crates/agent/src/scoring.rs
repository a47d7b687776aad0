//! Lead scoring
//!
//! A deterministic heuristic proxy for lead value. The score is recomputed
//! from scratch on every call rather than accumulated, so it is a pure
//! function of the profile contents.

use once_cell::sync::Lazy;
use regex::Regex;

use lead_agent_core::LeadProfile;

/// Points per populated field among the eight scored fields.
const FIELD_WEIGHT: i32 = 10;
/// Bonus for a budget in the millions.
const BIG_BUDGET_BONUS: i32 = 30;
/// Bonus for high urgency.
const URGENCY_BONUS: i32 = 20;
/// Contact info is gold: name and phone carry extra weight.
const NAME_BONUS: i32 = 20;
const PHONE_BONUS: i32 = 40;

/// Millions magnitude in the stored budget text: "2 million", "1.5m", "3M".
/// The budget field holds the raw message, so a bare letter "m" must not
/// count.
static MILLION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\s*m\b|million").unwrap());

/// Computes the lead score from a profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadScorer;

impl LeadScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score in [0, 200].
    pub fn score(&self, profile: &LeadProfile) -> i32 {
        let mut score = 0;

        let fields = [
            &profile.investment_type,
            &profile.budget_range,
            &profile.property_type,
            &profile.bedrooms,
            &profile.target_location,
            &profile.name,
            &profile.phone_number,
            &profile.email,
        ];
        let filled = fields.iter().filter(|f| f.is_some()).count() as i32;
        score += filled * FIELD_WEIGHT;

        if let Some(budget) = &profile.budget_range {
            if MILLION_RE.is_match(&budget.to_lowercase()) {
                score += BIG_BUDGET_BONUS;
            }
        }

        if profile.urgency.as_deref() == Some("High") {
            score += URGENCY_BONUS;
        }

        if profile.name.is_some() {
            score += NAME_BONUS;
        }
        if profile.phone_number.is_some() {
            score += PHONE_BONUS;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_scores_zero() {
        let scorer = LeadScorer::new();
        assert_eq!(scorer.score(&LeadProfile::default()), 0);
    }

    #[test]
    fn test_field_weights() {
        let scorer = LeadScorer::new();
        let mut profile = LeadProfile::default();

        profile.property_type = Some("Apartment".to_string());
        assert_eq!(scorer.score(&profile), 10);

        profile.target_location = Some("Downtown".to_string());
        assert_eq!(scorer.score(&profile), 20);
    }

    #[test]
    fn test_contact_bonuses() {
        let scorer = LeadScorer::new();
        let mut profile = LeadProfile::default();

        // Name: 10 for the field + 20 bonus
        profile.name = Some("John Smith".to_string());
        assert_eq!(scorer.score(&profile), 30);

        // Phone: 10 for the field + 40 bonus
        profile.phone_number = Some("+971501234567".to_string());
        assert_eq!(scorer.score(&profile), 100);
    }

    #[test]
    fn test_million_budget_bonus() {
        let scorer = LeadScorer::new();
        let mut profile = LeadProfile::default();

        profile.budget_range = Some("budget of 2 million dollars".to_string());
        assert_eq!(scorer.score(&profile), 40);

        profile.budget_range = Some("$1.5M".to_string());
        assert_eq!(scorer.score(&profile), 40);
    }

    #[test]
    fn test_incidental_letter_m_is_not_a_million() {
        let scorer = LeadScorer::new();
        let mut profile = LeadProfile::default();

        // Raw messages contain "m" all over ("apartment", "bedrooms"); only
        // a magnitude token counts
        profile.budget_range =
            Some("looking for an apartment, 2 bedrooms, budget $500k".to_string());
        assert_eq!(scorer.score(&profile), 10);
    }

    #[test]
    fn test_urgency_bonus() {
        let scorer = LeadScorer::new();
        let mut profile = LeadProfile::default();

        profile.urgency = Some("High".to_string());
        assert_eq!(scorer.score(&profile), 20);
    }

    #[test]
    fn test_score_bounded_and_pure() {
        let scorer = LeadScorer::new();
        let mut profile = LeadProfile::default();
        profile.investment_type = Some("Off-plan".to_string());
        profile.budget_range = Some("budget 3 million".to_string());
        profile.property_type = Some("Villa".to_string());
        profile.bedrooms = Some("3 Bedroom(s)".to_string());
        profile.target_location = Some("Marina".to_string());
        profile.urgency = Some("High".to_string());
        profile.name = Some("John Smith".to_string());
        profile.phone_number = Some("+971501234567".to_string());
        profile.email = Some("john@example.com".to_string());

        // Max: 8 * 10 + 30 + 20 + 20 + 40 = 190
        let score = scorer.score(&profile);
        assert_eq!(score, 190);
        assert!((0..=200).contains(&score));

        // Same input, same output
        assert_eq!(scorer.score(&profile), score);
    }

    #[test]
    fn test_scenario_discovery_score() {
        // Off-plan apartment, 2 bedrooms, Downtown, budget "$500k": five
        // fields at 10 each, no million bonus, no contact info
        let scorer = LeadScorer::new();
        let mut profile = LeadProfile::default();
        profile.investment_type = Some("Off-plan".to_string());
        profile.budget_range = Some(
            "I'm looking for an off-plan apartment, 2 bedrooms in Downtown, budget $500k"
                .to_string(),
        );
        profile.property_type = Some("Apartment".to_string());
        profile.bedrooms = Some("2 Bedroom(s)".to_string());
        profile.target_location = Some("Downtown".to_string());

        assert_eq!(scorer.score(&profile), 50);
    }
}
