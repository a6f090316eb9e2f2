//! Desk activity log — bounded, human-readable trace of pipeline and
//! operator actions. Observability only; nothing reads it for correctness.
//! Interior mutability so concurrent pipeline attempts can both write.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Most-recent entries retained.
pub const LOG_CAPACITY: usize = 50;

pub struct DeskLog {
    inner: Mutex<Inner>,
}

struct Inner {
    entries: VecDeque<LogEntry>,
    seq: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u64,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: LogKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogKind {
    SourceCheckFailed {
        url: String,
        reason: String,
    },
    Classified {
        topic: String,
    },
    StoryMatched {
        story_id: String,
        title: String,
    },
    Verified {
        status: String,
        alpha_score: f64,
    },
    Gated {
        impact_score: f64,
        threshold: f64,
    },
    Judged {
        lane: String,
    },
    PosterFailed {
        reason: String,
    },
    SignalCommitted {
        signal_id: String,
        draft_id: String,
        gated: bool,
        elapsed_ms: u64,
    },
    PipelineFailed {
        reason: String,
    },
    PipelineBusy,
    ReviewAction {
        draft_id: String,
        action: String,
    },
    StoryAction {
        story_id: String,
        action: String,
    },
    SupplementalRequested {
        signal_id: String,
        question: String,
    },
    CalibrationAdjusted {
        delta: f64,
        threshold: f64,
    },
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.ts.format("%H:%M:%S"))?;
        match &self.kind {
            LogKind::SourceCheckFailed { url, reason } => {
                write!(f, "source link check failed for {url}: {reason}")
            }
            LogKind::Classified { topic } => write!(f, "classified: {topic}"),
            LogKind::StoryMatched { title, .. } => write!(f, "matched story: {title}"),
            LogKind::Verified {
                status,
                alpha_score,
            } => write!(f, "verified ({status}), alpha {alpha_score}"),
            LogKind::Gated {
                impact_score,
                threshold,
            } => write!(
                f,
                "silenced: impact {impact_score} below threshold {threshold}"
            ),
            LogKind::Judged { lane } => write!(f, "routed to {lane} lane"),
            LogKind::PosterFailed { reason } => write!(f, "poster generation failed: {reason}"),
            LogKind::SignalCommitted {
                signal_id,
                gated,
                elapsed_ms,
                ..
            } => {
                if *gated {
                    write!(f, "committed {signal_id} (auto-filtered) in {elapsed_ms}ms")
                } else {
                    write!(f, "committed {signal_id} in {elapsed_ms}ms")
                }
            }
            LogKind::PipelineFailed { reason } => write!(f, "pipeline failed: {reason}"),
            LogKind::PipelineBusy => write!(f, "ingest rejected: a run is already in flight"),
            LogKind::ReviewAction { draft_id, action } => {
                write!(f, "review: {action} {draft_id}")
            }
            LogKind::StoryAction { story_id, action } => {
                write!(f, "story: {action} {story_id}")
            }
            LogKind::SupplementalRequested {
                signal_id,
                question,
            } => write!(f, "supplemental verification on {signal_id}: {question}"),
            LogKind::CalibrationAdjusted { delta, threshold } => {
                write!(f, "calibration moved by {delta} to {threshold}")
            }
        }
    }
}

impl DeskLog {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: VecDeque::with_capacity(LOG_CAPACITY),
                seq: 0,
            }),
        }
    }

    /// Append an entry, dropping the oldest past capacity. Mirrors to
    /// tracing so the terminal sees the same line.
    pub fn log(&self, kind: LogKind) {
        let mut inner = self.inner.lock().unwrap();
        let entry = LogEntry {
            seq: inner.seq,
            ts: Utc::now(),
            kind,
        };
        inner.seq += 1;

        info!("{entry}");

        if inner.entries.len() == LOG_CAPACITY {
            inner.entries.pop_front();
        }
        inner.entries.push_back(entry);
    }

    /// Entries newest-first.
    pub fn recent(&self) -> Vec<LogEntry> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .rev()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DeskLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded_to_capacity() {
        let log = DeskLog::new();
        for i in 0..(LOG_CAPACITY + 20) {
            log.log(LogKind::Classified {
                topic: format!("topic {i}"),
            });
        }

        assert_eq!(log.len(), LOG_CAPACITY);
        // newest entry first, oldest 20 dropped
        let entries = log.recent();
        assert_eq!(entries.first().unwrap().seq, (LOG_CAPACITY + 20 - 1) as u64);
        assert_eq!(entries.last().unwrap().seq, 20);
    }

    #[test]
    fn entries_serialize_with_type_tag() {
        let log = DeskLog::new();
        log.log(LogKind::PipelineBusy);

        let entries = log.recent();
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["type"], "pipeline_busy");
    }
}
