//! Lead qualification decision core
//!
//! Features:
//! - Lead scoring with contact-weighted heuristics
//! - Qualification classification (INITIAL / DISCOVERY / QUALIFIED)
//! - Escalation routing between local and cloud model tiers
//! - The per-turn qualification workflow as an explicit node pipeline
//!
//! The scorer, classifier, and router are pure and safe to share across
//! tasks. The workflow serializes nothing itself; per-session exclusion is
//! the caller's job (the server holds one lock per session).

pub mod qualification;
pub mod router;
pub mod scoring;
pub mod workflow;

pub use qualification::QualificationClassifier;
pub use router::EscalationRouter;
pub use scoring::LeadScorer;
pub use workflow::{
    should_notify, ExtractNode, LogTranscriptNode, NotifyPersistNode, QualificationWorkflow,
    RespondNode, ScoreClassifyNode, TurnState, UpdateAttemptsNode, WorkflowConfig, WorkflowNode,
};
