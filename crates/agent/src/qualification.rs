//! Qualification classification
//!
//! Maps a profile to its qualification stage. Decision order matters: the
//! contact-first rule is checked before the full-field rule, and either
//! qualifies. NEEDS_REVIEW is never produced here; the workflow flags it
//! from stagnation (see workflow module).

use lead_agent_core::{LeadProfile, QualificationStatus};

/// Classifies a profile into a qualification stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualificationClassifier;

impl QualificationClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, profile: &LeadProfile) -> QualificationStatus {
        // Name + phone plus any concrete interest is enough for the sales
        // team to act on.
        let has_contact = profile.has_contact();
        let has_interest = profile.property_type.is_some() || profile.budget_range.is_some();

        if has_contact && has_interest {
            return QualificationStatus::Qualified;
        }

        // Full requirements captured and at least one contact channel known.
        let all_core = profile.filled_core_count() == 5;
        let any_channel = profile.contact_fields().iter().any(|f| f.is_some());

        if all_core && any_channel {
            return QualificationStatus::Qualified;
        }

        if profile.filled_core_count() > 0 || has_contact {
            return QualificationStatus::Discovery;
        }

        QualificationStatus::Initial
    }
}
