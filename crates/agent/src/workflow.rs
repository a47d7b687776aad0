//! Qualification workflow
//!
//! Runs one conversation turn as an explicit pipeline of typed nodes:
//! Respond -> Extract -> ScoreClassify -> UpdateAttempts, then a single
//! conditional edge into NotifyPersist, then the unconditional transcript
//! log. Each node is testable in isolation; the branch decision lives in
//! `should_notify` rather than inside any node.
//!
//! Nodes handle their own failures. A responder timeout degrades to the
//! apology reply, side-effect errors are logged, and the turn always
//! completes with a consistent profile/status/score.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use lead_agent_core::{
    ConversationLog, ConversationState, LeadStore, ModelTier, Notifier, QualificationStatus,
    Responder, TurnResult, APOLOGY_REPLY,
};
use lead_agent_extraction::ProfileExtractor;

use crate::qualification::QualificationClassifier;
use crate::router::EscalationRouter;
use crate::scoring::LeadScorer;

/// Score above which the notify branch fires even without QUALIFIED status.
const NOTIFY_SCORE_THRESHOLD: i32 = 80;
/// Score above which an outbound call is also triggered.
const CALL_SCORE_THRESHOLD: i32 = 90;

/// Workflow tuning knobs
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Upper bound on the Respond step before degrading to the apology reply
    pub responder_timeout: Duration,
    /// Consecutive stagnant turns before escalating to the cloud tier
    pub stagnation_threshold: u32,
    /// Consecutive stagnant turns before flagging NEEDS_REVIEW
    pub needs_review_after: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            responder_timeout: Duration::from_secs(20),
            stagnation_threshold: 2,
            needs_review_after: 4,
        }
    }
}

/// Working state threaded through the pipeline for one turn.
pub struct TurnState<'a> {
    /// The session state, owned by the workflow for the turn's duration
    pub state: &'a mut ConversationState,
    pub user_message: String,
    /// Status entering the turn, for the stagnation comparison
    pub prior_status: QualificationStatus,
    pub tier: ModelTier,
    pub reply: String,
    /// Raw classifier output, before the NEEDS_REVIEW override
    pub classified: QualificationStatus,
    pub score: i32,
}

/// A typed pipeline step.
#[async_trait]
pub trait WorkflowNode: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, turn: &mut TurnState<'_>);
}

/// The single conditional edge: notify and persist the lead when it
/// qualifies, or when the score alone crosses the threshold.
pub fn should_notify(status: QualificationStatus, score: i32) -> bool {
    status == QualificationStatus::Qualified || score > NOTIFY_SCORE_THRESHOLD
}

/// Asks the Responder for a reply, bounded by a timeout.
pub struct RespondNode {
    responder: Arc<dyn Responder>,
    timeout: Duration,
}

impl RespondNode {
    pub fn new(responder: Arc<dyn Responder>, timeout: Duration) -> Self {
        Self { responder, timeout }
    }
}

#[async_trait]
impl WorkflowNode for RespondNode {
    fn name(&self) -> &'static str {
        "respond"
    }

    async fn run(&self, turn: &mut TurnState<'_>) {
        let generate = self
            .responder
            .generate(turn.state, &turn.user_message, turn.tier);

        turn.reply = match tokio::time::timeout(self.timeout, generate).await {
            Ok(reply) => reply,
            Err(_) => {
                tracing::warn!(
                    session_id = %turn.state.session_id,
                    timeout_secs = self.timeout.as_secs(),
                    "Responder timed out, using degraded reply"
                );
                APOLOGY_REPLY.to_string()
            }
        };
    }
}

/// Applies the extraction heuristics to the user's raw message. Runs
/// regardless of whether Respond succeeded or degraded.
pub struct ExtractNode {
    extractor: ProfileExtractor,
}

impl ExtractNode {
    pub fn new() -> Self {
        Self {
            extractor: ProfileExtractor::new(),
        }
    }
}

impl Default for ExtractNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowNode for ExtractNode {
    fn name(&self) -> &'static str {
        "extract"
    }

    async fn run(&self, turn: &mut TurnState<'_>) {
        self.extractor
            .apply(&turn.user_message, &mut turn.state.profile);
    }
}

/// Recomputes score and classification from the updated profile.
pub struct ScoreClassifyNode {
    scorer: LeadScorer,
    classifier: QualificationClassifier,
}

impl ScoreClassifyNode {
    pub fn new() -> Self {
        Self {
            scorer: LeadScorer::new(),
            classifier: QualificationClassifier::new(),
        }
    }
}

impl Default for ScoreClassifyNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowNode for ScoreClassifyNode {
    fn name(&self) -> &'static str {
        "score_classify"
    }

    async fn run(&self, turn: &mut TurnState<'_>) {
        turn.score = self.scorer.score(&turn.state.profile);
        turn.state.profile.lead_score = turn.score;
        turn.classified = self.classifier.classify(&turn.state.profile);
    }
}

/// Updates the attempt counter and resolves the presented status.
///
/// The counter resets on a classification change and otherwise increments;
/// it feeds the next turn's routing decision. When the counter reaches
/// `needs_review_after` without the lead qualifying, the presented status
/// becomes NEEDS_REVIEW and stays flagged (still counting) until the
/// classifier reaches QUALIFIED.
pub struct UpdateAttemptsNode {
    needs_review_after: u32,
}

impl UpdateAttemptsNode {
    pub fn new(needs_review_after: u32) -> Self {
        Self { needs_review_after }
    }
}

#[async_trait]
impl WorkflowNode for UpdateAttemptsNode {
    fn name(&self) -> &'static str {
        "update_attempts"
    }

    async fn run(&self, turn: &mut TurnState<'_>) {
        let changed = match (turn.prior_status, turn.classified) {
            (QualificationStatus::NeedsReview, QualificationStatus::Qualified) => true,
            // Still stuck: an unqualified classification under the flag is
            // not progress
            (QualificationStatus::NeedsReview, _) => false,
            (prior, classified) => prior != classified,
        };

        turn.state.attempts = if changed { 0 } else { turn.state.attempts + 1 };

        turn.state.status = if turn.classified != QualificationStatus::Qualified
            && turn.state.attempts >= self.needs_review_after
        {
            QualificationStatus::NeedsReview
        } else {
            turn.classified
        };
    }
}

/// Fires the hot-lead side effects and persists the lead record. Reached
/// only through `should_notify`; every failure is logged and swallowed.
pub struct NotifyPersistNode {
    notifier: Arc<dyn Notifier>,
    leads: Arc<dyn LeadStore>,
}

impl NotifyPersistNode {
    pub fn new(notifier: Arc<dyn Notifier>, leads: Arc<dyn LeadStore>) -> Self {
        Self { notifier, leads }
    }
}

#[async_trait]
impl WorkflowNode for NotifyPersistNode {
    fn name(&self) -> &'static str {
        "notify_persist"
    }

    async fn run(&self, turn: &mut TurnState<'_>) {
        let session_id = turn.state.session_id.clone();
        let profile = &turn.state.profile;

        if let Err(e) = self.notifier.send_sms(profile).await {
            tracing::warn!(session_id = %session_id, error = %e, "Hot-lead SMS failed");
        }
        if let Err(e) = self.notifier.send_email(profile, &session_id).await {
            tracing::warn!(session_id = %session_id, error = %e, "Hot-lead email failed");
        }
        if turn.score > CALL_SCORE_THRESHOLD {
            if let Err(e) = self.notifier.trigger_call().await {
                tracing::warn!(session_id = %session_id, error = %e, "Hot-lead call failed");
            }
        }

        if let Err(e) = self.leads.upsert_lead(&session_id, profile, turn.score).await {
            tracing::warn!(session_id = %session_id, error = %e, "Lead upsert failed");
        }
    }
}

/// Logs the transcript. Runs on every turn, qualifying or not.
pub struct LogTranscriptNode {
    conversations: Arc<dyn ConversationLog>,
}

impl LogTranscriptNode {
    pub fn new(conversations: Arc<dyn ConversationLog>) -> Self {
        Self { conversations }
    }
}

#[async_trait]
impl WorkflowNode for LogTranscriptNode {
    fn name(&self) -> &'static str {
        "log_transcript"
    }

    async fn run(&self, turn: &mut TurnState<'_>) {
        if let Err(e) = self
            .conversations
            .log_conversation(&turn.state.session_id, &turn.state.messages)
            .await
        {
            tracing::warn!(
                session_id = %turn.state.session_id,
                error = %e,
                "Transcript logging failed"
            );
        }
    }
}

/// Orchestrates the per-turn pipeline. All collaborators are injected so
/// tests can substitute doubles.
pub struct QualificationWorkflow {
    router: EscalationRouter,
    respond: RespondNode,
    extract: ExtractNode,
    score_classify: ScoreClassifyNode,
    update_attempts: UpdateAttemptsNode,
    notify_persist: NotifyPersistNode,
    log_transcript: LogTranscriptNode,
}

impl QualificationWorkflow {
    pub fn new(
        config: WorkflowConfig,
        responder: Arc<dyn Responder>,
        leads: Arc<dyn LeadStore>,
        conversations: Arc<dyn ConversationLog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            router: EscalationRouter::new(config.stagnation_threshold),
            respond: RespondNode::new(responder, config.responder_timeout),
            extract: ExtractNode::new(),
            score_classify: ScoreClassifyNode::new(),
            update_attempts: UpdateAttemptsNode::new(config.needs_review_after),
            notify_persist: NotifyPersistNode::new(notifier, leads),
            log_transcript: LogTranscriptNode::new(conversations),
        }
    }

    /// Run one turn: generate a reply, extract facts from the user's
    /// message, rescore, update the stagnation counter, then fire side
    /// effects when the lead is hot.
    pub async fn run_turn(
        &self,
        state: &mut ConversationState,
        user_message: &str,
        language: &str,
    ) -> TurnResult {
        state.language = language.to_string();

        // The tier is routed from the counter accumulated on previous turns
        let tier = self.router.route(user_message, state.attempts);
        let prior_status = state.status;

        let mut turn = TurnState {
            state,
            user_message: user_message.to_string(),
            prior_status,
            tier,
            reply: String::new(),
            classified: prior_status,
            score: 0,
        };

        self.respond.run(&mut turn).await;
        self.extract.run(&mut turn).await;
        self.score_classify.run(&mut turn).await;
        self.update_attempts.run(&mut turn).await;

        let user_message = turn.user_message.clone();
        let reply = turn.reply.clone();
        turn.state.push_user(user_message);
        turn.state.push_assistant(reply);
        turn.state.last_tier = tier;

        tracing::info!(
            session_id = %turn.state.session_id,
            status = %turn.state.status,
            score = turn.score,
            tier = %tier,
            attempts = turn.state.attempts,
            "Turn completed"
        );

        if should_notify(turn.state.status, turn.score) {
            self.notify_persist.run(&mut turn).await;
        }
        self.log_transcript.run(&mut turn).await;

        TurnResult {
            reply: turn.reply,
            profile: turn.state.profile.clone(),
            status: turn.state.status,
            score: turn.score,
            tier,
            attempts: turn.state.attempts,
        }
    }
}
