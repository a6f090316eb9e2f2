//! The entity store: the single source of truth for signals, drafts, and
//! stories. Mutations from pipeline runs arrive as one `PipelineCommit`
//! applied atomically; review and story actions edit entities in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signaldesk_common::{Draft, Signal, Story};

/// The serialized state blob handed to the persistence boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskState {
    pub signals: Vec<Signal>,
    pub drafts: Vec<Draft>,
    pub stories: Vec<Story>,
}

/// Everything one successful pipeline run writes, applied all-or-nothing.
#[derive(Debug, Clone)]
pub struct PipelineCommit {
    pub signal: Signal,
    pub draft: Draft,
    pub story: StoryCommit,
}

#[derive(Debug, Clone)]
pub enum StoryCommit {
    /// No story matched: create a new one already containing the signal.
    New(Story),
    /// A story matched: append the signal id and bump its update time.
    Append {
        story_id: String,
        at: DateTime<Utc>,
    },
}

impl DeskState {
    pub fn signal(&self, id: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.signal_id == id)
    }

    pub fn signal_mut(&mut self, id: &str) -> Option<&mut Signal> {
        self.signals.iter_mut().find(|s| s.signal_id == id)
    }

    pub fn draft(&self, id: &str) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.draft_id == id)
    }

    pub fn draft_mut(&mut self, id: &str) -> Option<&mut Draft> {
        self.drafts.iter_mut().find(|d| d.draft_id == id)
    }

    /// The draft derived from a given signal.
    pub fn draft_for_signal_mut(&mut self, signal_id: &str) -> Option<&mut Draft> {
        self.drafts.iter_mut().find(|d| d.signal_id == signal_id)
    }

    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.story_id == id)
    }

    pub fn story_mut(&mut self, id: &str) -> Option<&mut Story> {
        self.stories.iter_mut().find(|s| s.story_id == id)
    }

    /// Apply one pipeline run's writes. Newest entities go first, matching
    /// review-desk reading order. The borrow rules make this the atomic
    /// unit: no caller observes a partially applied commit.
    pub fn commit(&mut self, commit: PipelineCommit) {
        let PipelineCommit {
            signal,
            draft,
            story,
        } = commit;

        match story {
            StoryCommit::New(new_story) => {
                debug_assert_eq!(new_story.story_id, signal.story_id);
                debug_assert!(new_story.signals.contains(&signal.signal_id));
                self.stories.insert(0, new_story);
            }
            StoryCommit::Append { story_id, at } => {
                debug_assert_eq!(story_id, signal.story_id);
                if let Some(existing) = self.story_mut(&story_id) {
                    existing.signals.push(signal.signal_id.clone());
                    existing.latest_update_at = at;
                }
            }
        }

        self.signals.insert(0, signal);
        self.drafts.insert(0, draft);
    }

    /// Verify the signal↔story↔draft referential invariants. Returns the
    /// first violation found, if any.
    pub fn check_integrity(&self) -> Result<(), String> {
        for signal in &self.signals {
            let Some(story) = self.story(&signal.story_id) else {
                return Err(format!(
                    "signal {} references missing story {}",
                    signal.signal_id, signal.story_id
                ));
            };
            if !story.signals.contains(&signal.signal_id) {
                return Err(format!(
                    "story {} does not list member signal {}",
                    story.story_id, signal.signal_id
                ));
            }
        }
        for story in &self.stories {
            for member in &story.signals {
                if self.signal(member).is_none() {
                    return Err(format!(
                        "story {} lists unresolvable signal {member}",
                        story.story_id
                    ));
                }
            }
        }
        for draft in &self.drafts {
            if self.signal(&draft.signal_id).is_none() {
                return Err(format!(
                    "draft {} references missing signal {}",
                    draft.draft_id, draft.signal_id
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn seed_state_passes_integrity_check() {
        let state = seed::seed_state();
        state.check_integrity().expect("seed state is consistent");
    }

    #[test]
    fn lookups_resolve_seeded_entities() {
        let state = seed::seed_state();
        assert!(state.signal("sig_1").is_some());
        assert!(state.draft("d_1").is_some());
        assert!(state.story("story_1").is_some());
        assert!(state.signal("sig_missing").is_none());
    }

    #[test]
    fn append_commit_grows_matched_story() {
        let mut state = seed::seed_state();
        let before = state.story("story_1").unwrap().signals.len();

        let mut signal = state.signals[0].clone();
        signal.signal_id = "sig_new".to_string();
        signal.story_id = "story_1".to_string();
        let mut draft = state.drafts[0].clone();
        draft.draft_id = "d_new".to_string();
        draft.signal_id = "sig_new".to_string();

        state.commit(PipelineCommit {
            signal,
            draft,
            story: StoryCommit::Append {
                story_id: "story_1".to_string(),
                at: Utc::now(),
            },
        });

        let story = state.story("story_1").unwrap();
        assert_eq!(story.signals.len(), before + 1);
        assert_eq!(story.signals.last().unwrap(), "sig_new");
        state.check_integrity().unwrap();
    }
}
