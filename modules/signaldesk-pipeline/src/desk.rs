//! The desk facade: owns the entity store, calibration, log, and the
//! operational collaborators, and persists the state blob after every
//! mutation (fire-and-forget — a failed save is logged, never surfaced).

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;

use oracle_client::{IntelligenceOracle, SupplementalFinding};
use signaldesk_common::{
    CalibrationState, DeskError, EngagementMetrics, SystemMetric, TaskState, TaskStatus,
    VerificationStatus,
};

use crate::calibration::CalibrationEngine;
use crate::persist::StateStore;
use crate::pipeline::{CompletedRun, Orchestrator, PipelineOutcome};
use crate::publish::PublishChannel;
use crate::review::ReviewDesk;
use crate::run_log::{DeskLog, LogKind};
use crate::store::DeskState;
use crate::stories::StoryDesk;

/// What one `Desk::ingest` call produced, after the commit was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Committed {
        signal_id: String,
        draft_id: String,
        gated: bool,
    },
    Busy,
}

pub struct Desk {
    pub state: DeskState,
    pub log: DeskLog,
    pub tasks: Vec<TaskState>,
    pub metrics: Vec<SystemMetric>,
    calibration: CalibrationEngine,
    orchestrator: Orchestrator,
    review: ReviewDesk,
    stories: StoryDesk,
    store: Arc<dyn StateStore>,
}

impl Desk {
    /// Load the persisted state (or the seed) and wire up the desk.
    pub async fn open(
        oracle: Arc<dyn IntelligenceOracle>,
        channel: Arc<dyn PublishChannel>,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, DeskError> {
        let state = store
            .load()
            .await
            .map_err(|e| DeskError::Persistence(e.to_string()))?;

        Ok(Self {
            state,
            log: DeskLog::new(),
            tasks: default_tasks(),
            metrics: Vec::new(),
            calibration: CalibrationEngine::default(),
            orchestrator: Orchestrator::new(oracle.clone()),
            review: ReviewDesk::new(oracle.clone(), channel),
            stories: StoryDesk::new(oracle),
            store,
        })
    }

    pub fn calibration(&self) -> &CalibrationState {
        self.calibration.state()
    }

    // --- Pipeline ---

    pub async fn ingest(&mut self, raw_text: &str) -> Result<IngestOutcome, DeskError> {
        let outcome = self
            .orchestrator
            .process(raw_text, &self.state, &self.calibration, &self.log)
            .await?;

        match outcome {
            PipelineOutcome::Completed(run) => {
                let CompletedRun {
                    signal_id,
                    draft_id,
                    gated,
                    commit,
                    metric,
                } = *run;
                self.state.commit(commit);
                self.metrics.push(metric);
                self.persist().await;
                Ok(IngestOutcome::Committed {
                    signal_id,
                    draft_id,
                    gated,
                })
            }
            PipelineOutcome::Busy => Ok(IngestOutcome::Busy),
        }
    }

    // --- Review actions ---

    pub async fn approve(&mut self, draft_id: &str) -> bool {
        let changed = self
            .review
            .approve(&mut self.state, &self.log, draft_id)
            .await;
        // terminal drafts still take a record-keeping audit entry, so
        // persist whenever the draft resolved at all
        if changed || self.state.draft(draft_id).is_some() {
            self.persist().await;
        }
        changed
    }

    pub async fn reject(&mut self, draft_id: &str, reason: Option<String>) -> bool {
        let changed = self
            .review
            .reject(&mut self.state, &self.log, draft_id, reason);
        if changed || self.state.draft(draft_id).is_some() {
            self.persist().await;
        }
        changed
    }

    pub async fn edit(&mut self, draft_id: &str, content: String) -> bool {
        let changed = self.review.edit(&mut self.state, draft_id, content);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn update_thread(&mut self, draft_id: &str, items: Vec<String>) -> bool {
        let changed = self.review.update_thread(&mut self.state, draft_id, items);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn update_counter_case(
        &mut self,
        draft_id: &str,
        counter_case: Option<String>,
    ) -> bool {
        let changed = self
            .review
            .update_counter_case(&mut self.state, draft_id, counter_case);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn correct_claim(
        &mut self,
        signal_id: &str,
        claim_id: &str,
        status: VerificationStatus,
    ) -> bool {
        let changed =
            self.review
                .correct_claim(&mut self.state, &self.log, signal_id, claim_id, status);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn regenerate(
        &mut self,
        draft_id: &str,
        feedback: Option<&str>,
    ) -> Result<bool, DeskError> {
        let changed = self
            .review
            .regenerate(&mut self.state, &self.log, draft_id, feedback)
            .await?;
        if changed {
            self.persist().await;
        }
        Ok(changed)
    }

    pub async fn toggle_star(&mut self, signal_id: &str, evidence_id: &str) -> bool {
        let changed = self
            .review
            .toggle_star(&mut self.state, signal_id, evidence_id);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn request_more_evidence(
        &mut self,
        signal_id: &str,
        question: &str,
    ) -> Option<SupplementalFinding> {
        self.review
            .request_more_evidence(&self.state, &self.log, signal_id, question)
            .await
    }

    pub async fn checkpoint(&mut self, draft_id: &str, note: Option<String>) -> bool {
        let changed = self.review.checkpoint(&mut self.state, draft_id, note);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn record_publish_link(&mut self, draft_id: &str, url: String) -> bool {
        let changed = self
            .review
            .record_publish_link(&mut self.state, draft_id, url);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn record_performance(
        &mut self,
        draft_id: &str,
        metrics: EngagementMetrics,
    ) -> bool {
        let changed = self
            .review
            .record_performance(&mut self.state, draft_id, metrics);
        if changed {
            self.persist().await;
        }
        changed
    }

    // --- Story actions ---

    pub async fn update_story_summary(&mut self, story_id: &str, summary: String) -> bool {
        let changed = self.stories.update_summary(&mut self.state, story_id, summary);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn distill_story(&mut self, story_id: &str) -> Result<bool, DeskError> {
        let changed = self
            .stories
            .distill(&mut self.state, &self.log, story_id)
            .await?;
        if changed {
            self.persist().await;
        }
        Ok(changed)
    }

    pub async fn deep_dive(&self, story_id: &str) -> Option<String> {
        self.stories.deep_dive(&self.state, story_id).await
    }

    pub async fn merge_stories(&mut self, from_id: &str, into_id: &str) -> bool {
        let changed = self
            .stories
            .merge(&mut self.state, &self.log, from_id, into_id);
        if changed {
            self.persist().await;
        }
        changed
    }

    pub async fn split_story(
        &mut self,
        from_id: &str,
        signal_ids: &[String],
        title: String,
    ) -> Option<String> {
        let new_id = self
            .stories
            .split(&mut self.state, &self.log, from_id, signal_ids, title);
        if new_id.is_some() {
            self.persist().await;
        }
        new_id
    }

    // --- Calibration ---

    pub fn adjust_calibration(&mut self, delta: f64, kind: &str) -> f64 {
        let threshold = self.calibration.adjust(delta, kind);
        self.log.log(LogKind::CalibrationAdjusted { delta, threshold });
        threshold
    }

    /// Scheduled recalibration over the review history.
    pub fn recalibrate(&mut self) -> Option<f64> {
        let delta = self.calibration.recalibrate_from_reviews(&self.state.drafts);
        if let Some(delta) = delta {
            self.log.log(LogKind::CalibrationAdjusted {
                delta,
                threshold: self.calibration.state().impact_threshold,
            });
        }
        delta
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.state).await {
            warn!(error = %e, "state save failed");
        }
    }
}

fn default_tasks() -> Vec<TaskState> {
    let now = Utc::now();
    let task = |id: &str, label: &str, minutes: i64| TaskState {
        id: id.to_string(),
        label: label.to_string(),
        interval_minutes: minutes as u32,
        next_run: now + Duration::minutes(minutes),
        status: TaskStatus::Idle,
    };
    vec![
        task("hot_radar", "Hot Topic Radar", 30),
        task("official_feed", "Official Announcements", 5),
        task("rumor_mill", "Rumor Mill", 15),
    ]
}
