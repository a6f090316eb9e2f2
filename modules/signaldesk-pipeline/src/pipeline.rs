//! The pipeline orchestrator.
//!
//! One raw input in; one Signal + Draft pair out as a single commit, or a
//! clean failure with nothing produced. The orchestrator reads a state
//! snapshot and returns the commit; the caller swaps it in, so no partial
//! run is ever observable. At most one run is in flight per process; a
//! concurrent call gets `Busy` back immediately instead of queueing.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use regex::Regex;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use uuid::Uuid;

use oracle_client::{IntelligenceOracle, Verification};
use signaldesk_common::{
    AnalysisOutput, CalibrationState, Claim, ClaimType, DeskError, Draft, DraftStatus, Evidence,
    Level, NodeMetric, ReviewAction, ReviewAudit, Scores, Signal, SignalMaturity, Story,
    StoryStatus, SystemMetric, Verdict, Verifiability, CONFIG_VERSION,
};

use crate::calibration::{CalibrationEngine, AUTO_FILTER_REASON};
use crate::ids;
use crate::matcher;
use crate::run_log::{DeskLog, LogKind};
use crate::store::{DeskState, PipelineCommit, StoryCommit};

#[derive(Debug)]
pub enum PipelineOutcome {
    Completed(Box<CompletedRun>),
    /// Another run was in flight. Backpressure by rejection, not queueing.
    Busy,
}

/// Everything a successful run produced. `commit` is the atomic unit the
/// caller applies to the entity store.
#[derive(Debug)]
pub struct CompletedRun {
    pub signal_id: String,
    pub draft_id: String,
    pub gated: bool,
    pub commit: PipelineCommit,
    pub metric: SystemMetric,
}

pub struct Orchestrator {
    oracle: Arc<dyn IntelligenceOracle>,
    in_flight: Semaphore,
    url_pattern: Regex,
}

impl Orchestrator {
    pub fn new(oracle: Arc<dyn IntelligenceOracle>) -> Self {
        Self {
            oracle,
            in_flight: Semaphore::new(1),
            url_pattern: Regex::new(r"https?://\S+").expect("static pattern"),
        }
    }

    /// Drive one raw input through the full stage sequence against a
    /// snapshot of the entity store.
    pub async fn process(
        &self,
        raw_text: &str,
        snapshot: &DeskState,
        calibration: &CalibrationEngine,
        log: &DeskLog,
    ) -> Result<PipelineOutcome, DeskError> {
        let Ok(_permit) = self.in_flight.try_acquire() else {
            log.log(LogKind::PipelineBusy);
            return Ok(PipelineOutcome::Busy);
        };

        let run_id = Uuid::new_v4();
        let run_start = Instant::now();
        let mut nodes: Vec<NodeMetric> = Vec::new();
        info!(%run_id, "ingest run started");

        // 1. Best-effort source link check. Failure is advisory.
        if let Some(found) = self.url_pattern.find(raw_text) {
            let url = found.as_str();
            match self.oracle.validate_url(url).await {
                Ok(validation) if !validation.valid => {
                    let reason = validation.reason.unwrap_or_else(|| "unspecified".to_string());
                    warn!(url, reason = reason.as_str(), "source link failed validation");
                    log.log(LogKind::SourceCheckFailed {
                        url: url.to_string(),
                        reason,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(url, error = %e, "source link validation errored, continuing");
                    log.log(LogKind::SourceCheckFailed {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // 2. Classification. Fatal on failure.
        let classification = fatal_stage(
            &mut nodes,
            log,
            "classifier",
            DeskError::Classification,
            self.oracle.classify(raw_text),
        )
        .await?;
        log.log(LogKind::Classified {
            topic: classification.topic.clone(),
        });

        // 3. Story match against the snapshot, resolved before the async
        //    stages below so they cannot race a store mutation.
        let matched = matcher::match_story(&snapshot.stories, &classification)
            .map(|s| (s.story_id.clone(), s.title.clone(), s.summary.clone()));
        if let Some((story_id, title, _)) = &matched {
            log.log(LogKind::StoryMatched {
                story_id: story_id.clone(),
                title: title.clone(),
            });
        }
        let prior_summary = matched
            .as_ref()
            .map(|(_, _, summary)| summary.clone())
            .unwrap_or_default();

        // 4. Verification and impact analysis, concurrently. Either failure
        //    fails the signal; the surviving result is discarded.
        let join_start = Instant::now();
        let verify = async {
            let started = Instant::now();
            self.oracle
                .verify_claims(&classification.topic, &classification.entities)
                .await
                .map(|v| (v, started.elapsed()))
                .map_err(|e| DeskError::Verification(e.to_string()))
        };
        let analyze = async {
            let started = Instant::now();
            self.oracle
                .analyze_impact(&classification.topic, raw_text, &prior_summary)
                .await
                .map(|a| (a, started.elapsed()))
                .map_err(|e| DeskError::Analysis(e.to_string()))
        };

        let (verification, analysis) = match tokio::try_join!(verify, analyze) {
            Ok(((verification, verify_elapsed), (analysis, analyze_elapsed))) => {
                nodes.push(NodeMetric {
                    node: "verifier".to_string(),
                    latency_ms: verify_elapsed.as_millis() as u64,
                    success: true,
                });
                nodes.push(NodeMetric {
                    node: "analyst".to_string(),
                    latency_ms: analyze_elapsed.as_millis() as u64,
                    success: true,
                });
                (verification, analysis)
            }
            Err(err) => {
                let node = match &err {
                    DeskError::Verification(_) => "verifier",
                    _ => "analyst",
                };
                nodes.push(NodeMetric {
                    node: node.to_string(),
                    latency_ms: join_start.elapsed().as_millis() as u64,
                    success: false,
                });
                error!(node, error = %err, "pipeline stage failed");
                log.log(LogKind::PipelineFailed {
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };
        log.log(LogKind::Verified {
            status: verification.status.to_string(),
            alpha_score: analysis.alpha_score,
        });

        // 5. Gate check: pure function of calibration state and analysis.
        let gated = calibration.is_gated(analysis.impact_score());
        if gated {
            log.log(LogKind::Gated {
                impact_score: analysis.impact_score(),
                threshold: calibration.state().impact_threshold,
            });
        }

        // 6. Routing judgment. Fatal on failure.
        let routing = fatal_stage(
            &mut nodes,
            log,
            "judge",
            DeskError::Judgment,
            self.oracle.judge(&classification, &verification, &analysis),
        )
        .await?;
        log.log(LogKind::Judged {
            lane: routing.lane.to_string(),
        });
        let track = routing.track;

        // 7. Assemble the signal.
        let stamp = ids::stamp();
        let now = Utc::now();
        let signal_id = ids::signal_id(stamp);
        let story_id = matched
            .as_ref()
            .map(|(id, _, _)| id.clone())
            .unwrap_or_else(|| ids::story_id(stamp));

        let claims = vec![Claim {
            claim_id: ids::claim_id(&signal_id, 0),
            claim_text: classification.topic.clone(),
            claim_type: ClaimType::Event,
            entities: classification.entities.clone(),
            verifiability: Verifiability::Verifiable,
            status: verification.status,
            manual_verified: None,
        }];

        let evidence = verification
            .grounding_chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let url = chunk.uri.clone().unwrap_or_default();
                Evidence {
                    evidence_id: ids::evidence_id(&signal_id, i),
                    source_tier: self.oracle.url_tier(&url),
                    url,
                    title: chunk
                        .title
                        .clone()
                        .unwrap_or_else(|| "Evidence Snapshot".to_string()),
                    snippet: chunk.text.clone(),
                    captured_at: now,
                    starred: false,
                }
            })
            .collect();

        let verdict = Verdict {
            status: verification.status,
            confidence: verification.confidence,
            supporting_sources: verification.sources.clone(),
            contradictions: vec![],
            what_would_confirm: vec![verification.what_would_confirm.clone()],
        };
        let scores = compute_scores(
            &verification,
            &analysis,
            classification.discussion_level,
            calibration.state(),
        );

        let signal = Signal {
            signal_id: signal_id.clone(),
            story_id: story_id.clone(),
            cluster_id: ids::cluster_id(stamp),
            topic: classification.topic,
            domain: classification.domain,
            sub_sector: classification.sub_sector,
            signal_type: classification.signal_type,
            maturity: SignalMaturity::Developing,
            time_sensitivity: classification.time_sensitivity,
            discussion_level: classification.discussion_level,
            entities: classification.entities,
            claims,
            evidence,
            analysis,
            verdict,
            routing,
            scores,
            created_at: now,
            config_version: CONFIG_VERSION.to_string(),
        };

        // 8. Polished draft. Fatal on failure.
        let draft_output = fatal_stage(
            &mut nodes,
            log,
            "drafter",
            DeskError::DraftGeneration,
            self.oracle.generate_draft(&signal, &signal.analysis, None),
        )
        .await?;

        // 9. Poster for a brand-new story. Best effort: a failure degrades
        //    the run, never fails it.
        let poster_url = if matched.is_none() {
            match self
                .oracle
                .generate_poster(&signal.topic, &signal.analysis.market_impact)
                .await
            {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(error = %e, "poster generation failed, continuing without one");
                    log.log(LogKind::PosterFailed {
                        reason: e.to_string(),
                    });
                    None
                }
            }
        } else {
            None
        };

        // 10. Package the commit. The caller applies it in one store call.
        let draft_id = ids::draft_id(stamp);
        let draft = Draft {
            draft_id: draft_id.clone(),
            signal_id: signal_id.clone(),
            track,
            status: if gated {
                DraftStatus::Rejected
            } else {
                DraftStatus::Draft
            },
            content: draft_output.content,
            labels: draft_output.labels,
            counter_case: draft_output.counter_case,
            fact_checksum: draft_output.fact_checksum,
            thread_items: draft_output.thread_items,
            audit_log: if gated {
                vec![ReviewAudit::now(ReviewAction::Reject {
                    reason: Some(AUTO_FILTER_REASON.to_string()),
                })]
            } else {
                vec![]
            },
            regeneration_count: 0,
            performance: None,
            tweet_url: None,
            published_at: None,
            created_at: now,
            config_version: CONFIG_VERSION.to_string(),
        };

        let story = match matched {
            Some((matched_id, _, _)) => StoryCommit::Append {
                story_id: matched_id,
                at: now,
            },
            None => StoryCommit::New(Story {
                story_id,
                title: signal.topic.clone(),
                status: StoryStatus::New,
                signals: vec![signal_id.clone()],
                maturity: SignalMaturity::Developing,
                summary: signal.analysis.market_impact.clone(),
                distilled_note: None,
                poster_url,
                video_url: None,
                latest_update_at: now,
            }),
        };

        let elapsed_ms = run_start.elapsed().as_millis() as u64;
        log.log(LogKind::SignalCommitted {
            signal_id: signal_id.clone(),
            draft_id: draft_id.clone(),
            gated,
            elapsed_ms,
        });

        Ok(PipelineOutcome::Completed(Box::new(CompletedRun {
            signal_id,
            draft_id,
            gated,
            commit: PipelineCommit {
                signal,
                draft,
                story,
            },
            metric: SystemMetric {
                latency_ms: elapsed_ms,
                success: true,
                node_breakdown: nodes,
                timestamp: now,
            },
        })))
    }
}

/// Run a fatal stage: time it, record its node metric, and convert any
/// oracle failure into the stage's error variant after logging it.
async fn fatal_stage<T, F>(
    nodes: &mut Vec<NodeMetric>,
    log: &DeskLog,
    node: &'static str,
    to_error: fn(String) -> DeskError,
    fut: F,
) -> Result<T, DeskError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let started = Instant::now();
    match fut.await {
        Ok(value) => {
            nodes.push(NodeMetric {
                node: node.to_string(),
                latency_ms: started.elapsed().as_millis() as u64,
                success: true,
            });
            Ok(value)
        }
        Err(e) => {
            nodes.push(NodeMetric {
                node: node.to_string(),
                latency_ms: started.elapsed().as_millis() as u64,
                success: false,
            });
            let err = to_error(e.to_string());
            error!(node, error = %e, "pipeline stage failed");
            log.log(LogKind::PipelineFailed {
                reason: err.to_string(),
            });
            Err(err)
        }
    }
}

/// Scores derived from the stage outputs. `impact` must equal the value the
/// gate compared, so both always read `alpha_score * 10`.
fn compute_scores(
    verification: &Verification,
    analysis: &AnalysisOutput,
    discussion_level: Level,
    calibration: &CalibrationState,
) -> Scores {
    let impact = analysis.impact_score();
    let credibility =
        ((verification.confidence + calibration.credibility_bias).clamp(0.0, 1.0) * 100.0).round();
    let discussion = match discussion_level {
        Level::Low => 40.0,
        Level::Medium => 60.0,
        Level::High => 85.0,
    };
    let novelty = 80.0;
    let total = ((novelty + credibility + discussion + impact) / 4.0).round();

    Scores {
        novelty,
        credibility,
        discussion,
        impact,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signaldesk_common::{Stance, VerificationStatus};

    fn verification(confidence: f64) -> Verification {
        Verification {
            status: VerificationStatus::Confirmed,
            confidence,
            sources: vec![],
            grounding_chunks: vec![],
            what_would_confirm: String::new(),
        }
    }

    fn analysis(alpha: f64) -> AnalysisOutput {
        AnalysisOutput {
            key_changes: String::new(),
            market_impact: String::new(),
            narrative_impact: String::new(),
            affected_assets: vec![],
            stance: Stance::Neutral,
            stance_reasoning: None,
            recommended_action: None,
            alpha_score: alpha,
            narrative_affinity: None,
            what_would_change_mind: None,
        }
    }

    #[test]
    fn impact_score_is_alpha_times_ten() {
        let scores = compute_scores(
            &verification(0.9),
            &analysis(6.5),
            Level::Medium,
            &CalibrationState::default(),
        );
        assert_eq!(scores.impact, 65.0);
    }

    #[test]
    fn credibility_applies_bias_and_clamps() {
        let calibration = CalibrationState::default(); // bias 0.05
        let scores = compute_scores(
            &verification(0.9),
            &analysis(5.0),
            Level::Low,
            &calibration,
        );
        assert_eq!(scores.credibility, 95.0);

        let maxed = compute_scores(
            &verification(0.99),
            &analysis(5.0),
            Level::Low,
            &calibration,
        );
        assert_eq!(maxed.credibility, 100.0);
    }
}
