//! Review workflow — the draft state machine.
//!
//! `published` and `rejected` are terminal. Every operator action is total:
//! unknown ids are no-ops, and actions against a terminal draft append a
//! record-keeping audit entry without changing status, so a stale review
//! view can never produce an error.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use oracle_client::{IntelligenceOracle, SupplementalFinding};
use signaldesk_common::{
    DeskError, DraftStatus, EngagementMetrics, ReviewAction, ReviewAudit, VerificationStatus,
};

use crate::publish::PublishChannel;
use crate::run_log::{DeskLog, LogKind};
use crate::store::DeskState;

pub struct ReviewDesk {
    oracle: Arc<dyn IntelligenceOracle>,
    channel: Arc<dyn PublishChannel>,
}

impl ReviewDesk {
    pub fn new(oracle: Arc<dyn IntelligenceOracle>, channel: Arc<dyn PublishChannel>) -> Self {
        Self { oracle, channel }
    }

    /// Publish a draft. The content goes out on the publish channel; a
    /// channel failure is advisory (the decision already happened).
    /// Returns false if nothing transitioned.
    pub async fn approve(&self, state: &mut DeskState, log: &DeskLog, draft_id: &str) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };

        draft.audit_log.push(ReviewAudit::now(ReviewAction::Approve));
        if draft.status.is_terminal() {
            return false;
        }

        draft.status = DraftStatus::Published;
        draft.published_at = Some(Utc::now());
        let content = draft.content.clone();

        log.log(LogKind::ReviewAction {
            draft_id: draft_id.to_string(),
            action: "approve".to_string(),
        });

        if let Err(e) = self.channel.publish(&content).await {
            warn!(draft_id, error = %e, "publish channel failed; draft stays published");
        }
        true
    }

    /// Reject a draft, recording the reason. On an already-terminal draft
    /// this only appends the audit entry (e.g. a manual retraction note).
    pub fn reject(
        &self,
        state: &mut DeskState,
        log: &DeskLog,
        draft_id: &str,
        reason: Option<String>,
    ) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };

        draft
            .audit_log
            .push(ReviewAudit::now(ReviewAction::Reject { reason }));
        if draft.status.is_terminal() {
            return false;
        }

        draft.status = DraftStatus::Rejected;
        log.log(LogKind::ReviewAction {
            draft_id: draft_id.to_string(),
            action: "reject".to_string(),
        });
        true
    }

    // --- Content-only edits. No audit entry: the trail records decisions.

    pub fn edit(&self, state: &mut DeskState, draft_id: &str, content: String) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };
        if draft.status == DraftStatus::Published {
            return false;
        }
        draft.content = content;
        true
    }

    pub fn update_thread(&self, state: &mut DeskState, draft_id: &str, items: Vec<String>) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };
        if draft.status == DraftStatus::Published {
            return false;
        }
        draft.thread_items = items;
        true
    }

    pub fn update_counter_case(
        &self,
        state: &mut DeskState,
        draft_id: &str,
        counter_case: Option<String>,
    ) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };
        if draft.status == DraftStatus::Published {
            return false;
        }
        draft.counter_case = counter_case;
        true
    }

    /// Amend a claim's verification status. Claims are never deleted, only
    /// amended; the correction is audited on the owning signal's draft.
    pub fn correct_claim(
        &self,
        state: &mut DeskState,
        log: &DeskLog,
        signal_id: &str,
        claim_id: &str,
        status: VerificationStatus,
    ) -> bool {
        {
            let Some(signal) = state.signal_mut(signal_id) else {
                return false;
            };
            let Some(claim) = signal.claims.iter_mut().find(|c| c.claim_id == claim_id) else {
                return false;
            };
            claim.status = status;
            claim.manual_verified = Some(true);
        }

        if let Some(draft) = state.draft_for_signal_mut(signal_id) {
            let draft_id = draft.draft_id.clone();
            draft.audit_log.push(ReviewAudit::now(ReviewAction::Correct {
                claim_id: claim_id.to_string(),
            }));
            log.log(LogKind::ReviewAction {
                draft_id,
                action: "correct".to_string(),
            });
        }
        true
    }

    /// Regenerate the draft body with optional operator feedback. Replaces
    /// content fields, bumps `regeneration_count` by exactly one, and never
    /// touches status. Published drafts are immutable and skipped.
    pub async fn regenerate(
        &self,
        state: &mut DeskState,
        log: &DeskLog,
        draft_id: &str,
        feedback: Option<&str>,
    ) -> Result<bool, DeskError> {
        let Some(draft) = state.draft(draft_id) else {
            return Ok(false);
        };
        if draft.status == DraftStatus::Published {
            return Ok(false);
        }
        let Some(signal) = state.signal(&draft.signal_id).cloned() else {
            return Ok(false);
        };

        let output = self
            .oracle
            .generate_draft(&signal, &signal.analysis, feedback)
            .await
            .map_err(|e| DeskError::DraftGeneration(e.to_string()))?;

        let Some(draft) = state.draft_mut(draft_id) else {
            return Ok(false);
        };
        draft.content = output.content;
        draft.labels = output.labels;
        draft.counter_case = output.counter_case;
        draft.fact_checksum = output.fact_checksum;
        draft.thread_items = output.thread_items;
        draft.regeneration_count += 1;

        log.log(LogKind::ReviewAction {
            draft_id: draft_id.to_string(),
            action: "regenerate".to_string(),
        });
        Ok(true)
    }

    /// Flip the starred flag on one evidence item. Independent of draft
    /// state; toggling twice restores the original value.
    pub fn toggle_star(&self, state: &mut DeskState, signal_id: &str, evidence_id: &str) -> bool {
        let Some(signal) = state.signal_mut(signal_id) else {
            return false;
        };
        let Some(item) = signal
            .evidence
            .iter_mut()
            .find(|e| e.evidence_id == evidence_id)
        else {
            return false;
        };
        item.starred = !item.starred;
        true
    }

    /// Ask the oracle a follow-up question about a signal. Advisory: the
    /// result goes back to the operator and a failure is only logged.
    pub async fn request_more_evidence(
        &self,
        state: &DeskState,
        log: &DeskLog,
        signal_id: &str,
        question: &str,
    ) -> Option<SupplementalFinding> {
        let topic = state.signal(signal_id)?.topic.clone();

        log.log(LogKind::SupplementalRequested {
            signal_id: signal_id.to_string(),
            question: question.to_string(),
        });

        match self
            .oracle
            .supplemental_verification(&topic, question)
            .await
        {
            Ok(finding) => Some(finding),
            Err(e) => {
                warn!(signal_id, error = %e, "supplemental verification failed");
                None
            }
        }
    }

    /// Mark a review checkpoint. Pure record-keeping, allowed anywhere.
    pub fn checkpoint(
        &self,
        state: &mut DeskState,
        draft_id: &str,
        note: Option<String>,
    ) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };
        draft
            .audit_log
            .push(ReviewAudit::now(ReviewAction::Checkpoint { note }));
        true
    }

    /// Attach the live URL of a published post.
    pub fn record_publish_link(&self, state: &mut DeskState, draft_id: &str, url: String) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };
        draft.tweet_url = Some(url.clone());
        draft
            .audit_log
            .push(ReviewAudit::now(ReviewAction::PublishLink { url }));
        true
    }

    /// Append post-publication engagement metrics. The one mutation allowed
    /// on published drafts beyond audit entries.
    pub fn record_performance(
        &self,
        state: &mut DeskState,
        draft_id: &str,
        metrics: EngagementMetrics,
    ) -> bool {
        let Some(draft) = state.draft_mut(draft_id) else {
            return false;
        };
        draft.performance = Some(metrics);
        true
    }
}
