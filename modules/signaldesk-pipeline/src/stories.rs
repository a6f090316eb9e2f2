//! Story desk — operator actions on story clusters.
//!
//! Merge and split re-point member signals and their drafts in one pass,
//! so the signal↔story referential invariant holds before and after.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use oracle_client::IntelligenceOracle;
use signaldesk_common::{DeskError, ReviewAction, ReviewAudit, Story, StoryStatus};

use crate::ids;
use crate::run_log::{DeskLog, LogKind};
use crate::store::DeskState;

pub struct StoryDesk {
    oracle: Arc<dyn IntelligenceOracle>,
}

impl StoryDesk {
    pub fn new(oracle: Arc<dyn IntelligenceOracle>) -> Self {
        Self { oracle }
    }

    pub fn update_summary(&self, state: &mut DeskState, story_id: &str, summary: String) -> bool {
        let Some(story) = state.story_mut(story_id) else {
            return false;
        };
        story.summary = summary;
        story.latest_update_at = Utc::now();
        true
    }

    /// Condense the story and its member signals into a briefing note.
    pub async fn distill(
        &self,
        state: &mut DeskState,
        log: &DeskLog,
        story_id: &str,
    ) -> Result<bool, DeskError> {
        let Some(story) = state.story(story_id).cloned() else {
            return Ok(false);
        };
        let members: Vec<_> = story
            .signals
            .iter()
            .filter_map(|id| state.signal(id))
            .cloned()
            .collect();

        let note = self
            .oracle
            .distill_story(&story, &members)
            .await
            .map_err(|e| DeskError::Story(e.to_string()))?;

        if let Some(story) = state.story_mut(story_id) {
            story.distilled_note = Some(note);
            story.latest_update_at = Utc::now();
        }
        log.log(LogKind::StoryAction {
            story_id: story_id.to_string(),
            action: "distill".to_string(),
        });
        Ok(true)
    }

    /// Long-form research report. Advisory output for the operator; a
    /// failure is logged, not surfaced as an error.
    pub async fn deep_dive(&self, state: &DeskState, story_id: &str) -> Option<String> {
        let story = state.story(story_id)?.clone();
        let members: Vec<_> = story
            .signals
            .iter()
            .filter_map(|id| state.signal(id))
            .cloned()
            .collect();

        match self.oracle.deep_dive_report(&story, &members).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(story_id, error = %e, "deep dive failed");
                None
            }
        }
    }

    /// Fold `from`'s members into `into`. Member signals are re-pointed,
    /// their drafts audited, and the source story archived empty.
    pub fn merge(
        &self,
        state: &mut DeskState,
        log: &DeskLog,
        from_id: &str,
        into_id: &str,
    ) -> bool {
        if from_id == into_id || state.story(into_id).is_none() {
            return false;
        }
        let Some(from) = state.story_mut(from_id) else {
            return false;
        };

        let moved = std::mem::take(&mut from.signals);
        let now = Utc::now();
        from.status = StoryStatus::Archived;
        from.latest_update_at = now;

        for signal_id in &moved {
            if let Some(signal) = state.signal_mut(signal_id) {
                signal.story_id = into_id.to_string();
            }
            if let Some(draft) = state.draft_for_signal_mut(signal_id) {
                draft.audit_log.push(ReviewAudit::now(ReviewAction::Merge {
                    from_story: from_id.to_string(),
                }));
            }
        }

        if let Some(into) = state.story_mut(into_id) {
            into.signals.extend(moved);
            into.latest_update_at = now;
        }

        log.log(LogKind::StoryAction {
            story_id: into_id.to_string(),
            action: format!("merge from {from_id}"),
        });
        true
    }

    /// Carve the named signals out of a story into a new one. Returns the
    /// new story's id, or None when nothing was moved.
    pub fn split(
        &self,
        state: &mut DeskState,
        log: &DeskLog,
        from_id: &str,
        signal_ids: &[String],
        title: String,
    ) -> Option<String> {
        let from = state.story_mut(from_id)?;

        let moving: Vec<String> = from
            .signals
            .iter()
            .filter(|id| signal_ids.contains(id))
            .cloned()
            .collect();
        if moving.is_empty() {
            return None;
        }

        let now = Utc::now();
        from.signals.retain(|id| !moving.contains(id));
        from.latest_update_at = now;
        let summary = from.summary.clone();
        let maturity = from.maturity;

        let new_id = ids::story_id(ids::stamp());
        for signal_id in &moving {
            if let Some(signal) = state.signal_mut(signal_id) {
                signal.story_id = new_id.clone();
            }
            if let Some(draft) = state.draft_for_signal_mut(signal_id) {
                draft.audit_log.push(ReviewAudit::now(ReviewAction::Split {
                    to_story: new_id.clone(),
                }));
            }
        }

        state.stories.insert(
            0,
            Story {
                story_id: new_id.clone(),
                title,
                status: StoryStatus::New,
                signals: moving,
                maturity,
                summary,
                distilled_note: None,
                poster_url: None,
                video_url: None,
                latest_update_at: now,
            },
        );

        log.log(LogKind::StoryAction {
            story_id: new_id.clone(),
            action: format!("split from {from_id}"),
        });
        Some(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use oracle_client::ScriptedOracle;

    use crate::seed;

    fn desk() -> StoryDesk {
        StoryDesk::new(Arc::new(ScriptedOracle::new()))
    }

    #[test]
    fn merge_repoints_members_and_archives_source() {
        let mut state = seed::seed_state();
        let log = DeskLog::new();

        assert!(desk().merge(&mut state, &log, "story_2", "story_1"));

        let target = state.story("story_1").unwrap();
        assert!(target.signals.contains(&"sig_2".to_string()));
        assert_eq!(state.signal("sig_2").unwrap().story_id, "story_1");

        let source = state.story("story_2").unwrap();
        assert!(source.signals.is_empty());
        assert_eq!(source.status, StoryStatus::Archived);

        // the moved signal's draft carries a merge audit entry
        let draft = state.draft("d_2").unwrap();
        assert!(matches!(
            draft.audit_log.last().unwrap().action,
            ReviewAction::Merge { .. }
        ));

        state.check_integrity().unwrap();
    }

    #[test]
    fn merge_into_self_or_unknown_is_noop() {
        let mut state = seed::seed_state();
        let log = DeskLog::new();

        assert!(!desk().merge(&mut state, &log, "story_1", "story_1"));
        assert!(!desk().merge(&mut state, &log, "story_1", "story_missing"));
        state.check_integrity().unwrap();
    }

    #[test]
    fn split_moves_named_signals_into_new_story() {
        let mut state = seed::seed_state();
        let log = DeskLog::new();

        // put both signals in one story first
        desk().merge(&mut state, &log, "story_2", "story_1");

        let new_id = desk()
            .split(
                &mut state,
                &log,
                "story_1",
                &["sig_2".to_string()],
                "L2 Spike Follow-up".to_string(),
            )
            .expect("split happened");

        assert_eq!(state.signal("sig_2").unwrap().story_id, new_id);
        let new_story = state.story(&new_id).unwrap();
        assert_eq!(new_story.signals, vec!["sig_2".to_string()]);
        assert!(!state
            .story("story_1")
            .unwrap()
            .signals
            .contains(&"sig_2".to_string()));

        state.check_integrity().unwrap();
    }

    #[test]
    fn split_with_no_matching_members_is_noop() {
        let mut state = seed::seed_state();
        let log = DeskLog::new();

        let result = desk().split(
            &mut state,
            &log,
            "story_1",
            &["sig_unknown".to_string()],
            "Nothing".to_string(),
        );
        assert!(result.is_none());
        state.check_integrity().unwrap();
    }
}
