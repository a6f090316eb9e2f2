//! The calibration engine: owns the acceptance threshold and bias used for
//! auto-gating. The gate itself is a pure comparison so gating policy can
//! be tested against recorded analysis outputs, independent of the oracle.

use chrono::Utc;
use tracing::info;

use signaldesk_common::{AdjustmentEntry, CalibrationState, Draft, ReviewAction};

/// Threshold bounds. Adjustments clamp here regardless of how hard an
/// operator leans on the dial.
const THRESHOLD_FLOOR: f64 = 30.0;
const THRESHOLD_CEILING: f64 = 90.0;

/// One notch of review-feedback recalibration.
const FEEDBACK_STEP: f64 = 5.0;

/// Automatic rejections carry this reason; they are not operator feedback.
pub const AUTO_FILTER_REASON: &str = "Auto Filter";

#[derive(Default)]
pub struct CalibrationEngine {
    state: CalibrationState,
}

impl CalibrationEngine {
    pub fn new(state: CalibrationState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// Pure gate check: a signal is gated (auto-rejected) when its impact
    /// score falls below the threshold.
    pub fn is_gated(&self, impact_score: f64) -> bool {
        impact_score < self.state.impact_threshold
    }

    /// Move the threshold by `delta`, recording provenance. Never mutates
    /// without an adjustment-log entry.
    pub fn adjust(&mut self, delta: f64, kind: &str) -> f64 {
        let before = self.state.impact_threshold;
        let after = (before + delta).clamp(THRESHOLD_FLOOR, THRESHOLD_CEILING);
        let applied = after - before;

        self.state.impact_threshold = after;
        self.state.last_calibrated_at = Utc::now();
        self.state.adjustment_log.push(AdjustmentEntry {
            kind: kind.to_string(),
            delta: applied,
            timestamp: self.state.last_calibrated_at,
        });

        info!(kind, delta = applied, threshold = after, "calibration adjusted");
        after
    }

    /// Operator-feedback recalibration: read the audited approve/reject
    /// decisions across drafts and nudge the threshold one notch toward
    /// operator behavior. Approving nearly everything means the gate is too
    /// strict; rejecting nearly everything means it is too loose. Returns
    /// the applied delta, or None when feedback is absent or balanced.
    pub fn recalibrate_from_reviews(&mut self, drafts: &[Draft]) -> Option<f64> {
        let mut approvals = 0u32;
        let mut rejections = 0u32;

        for draft in drafts {
            for audit in &draft.audit_log {
                match &audit.action {
                    ReviewAction::Approve => approvals += 1,
                    ReviewAction::Reject { reason }
                        if reason.as_deref() != Some(AUTO_FILTER_REASON) =>
                    {
                        rejections += 1
                    }
                    _ => {}
                }
            }
        }

        let total = approvals + rejections;
        if total == 0 {
            return None;
        }

        let approve_rate = f64::from(approvals) / f64::from(total);
        let delta = if approve_rate >= 0.7 {
            -FEEDBACK_STEP
        } else if approve_rate <= 0.3 {
            FEEDBACK_STEP
        } else {
            return None;
        };

        self.adjust(delta, "review_feedback");
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use signaldesk_common::{DraftStatus, ReviewAudit, Track, CONFIG_VERSION};

    fn draft_with_audits(actions: Vec<ReviewAction>) -> Draft {
        Draft {
            draft_id: "d_t".to_string(),
            signal_id: "sig_t".to_string(),
            track: Track::Traffic,
            status: DraftStatus::Draft,
            content: String::new(),
            labels: vec![],
            counter_case: None,
            fact_checksum: None,
            thread_items: vec![],
            audit_log: actions.into_iter().map(ReviewAudit::now).collect(),
            regeneration_count: 0,
            performance: None,
            tweet_url: None,
            published_at: None,
            created_at: Utc::now(),
            config_version: CONFIG_VERSION.to_string(),
        }
    }

    #[test]
    fn default_gate_threshold_is_sixty() {
        let engine = CalibrationEngine::default();
        assert!(engine.is_gated(50.0));
        assert!(!engine.is_gated(90.0));
        // boundary: not strictly below the threshold
        assert!(!engine.is_gated(60.0));
    }

    #[test]
    fn adjust_records_provenance_and_clamps() {
        let mut engine = CalibrationEngine::default();

        engine.adjust(10.0, "manual");
        assert_eq!(engine.state().impact_threshold, 70.0);
        assert_eq!(engine.state().adjustment_log.len(), 1);
        assert_eq!(engine.state().adjustment_log[0].kind, "manual");

        engine.adjust(100.0, "manual");
        assert_eq!(engine.state().impact_threshold, 90.0);
        // the logged delta is what was actually applied after clamping
        assert_eq!(engine.state().adjustment_log[1].delta, 20.0);
    }

    #[test]
    fn heavy_approval_lowers_threshold() {
        let mut engine = CalibrationEngine::default();
        let drafts = vec![
            draft_with_audits(vec![ReviewAction::Approve]),
            draft_with_audits(vec![ReviewAction::Approve]),
            draft_with_audits(vec![ReviewAction::Approve]),
        ];

        let delta = engine.recalibrate_from_reviews(&drafts);
        assert_eq!(delta, Some(-FEEDBACK_STEP));
        assert_eq!(engine.state().impact_threshold, 55.0);
    }

    #[test]
    fn heavy_rejection_raises_threshold() {
        let mut engine = CalibrationEngine::default();
        let drafts = vec![
            draft_with_audits(vec![ReviewAction::Reject {
                reason: Some("Low impact".to_string()),
            }]),
            draft_with_audits(vec![ReviewAction::Reject { reason: None }]),
        ];

        assert_eq!(engine.recalibrate_from_reviews(&drafts), Some(FEEDBACK_STEP));
        assert_eq!(engine.state().impact_threshold, 65.0);
    }

    #[test]
    fn auto_filter_rejections_are_not_operator_feedback() {
        let mut engine = CalibrationEngine::default();
        let drafts = vec![draft_with_audits(vec![ReviewAction::Reject {
            reason: Some(AUTO_FILTER_REASON.to_string()),
        }])];

        assert_eq!(engine.recalibrate_from_reviews(&drafts), None);
        assert!(engine.state().adjustment_log.is_empty());
    }

    #[test]
    fn balanced_feedback_leaves_threshold_alone() {
        let mut engine = CalibrationEngine::default();
        let drafts = vec![
            draft_with_audits(vec![ReviewAction::Approve]),
            draft_with_audits(vec![ReviewAction::Reject { reason: None }]),
        ];

        assert_eq!(engine.recalibrate_from_reviews(&drafts), None);
        assert_eq!(engine.state().impact_threshold, 60.0);
    }
}
