//! Workflow tests for the review state machine and the draft audit trail.

use std::sync::Arc;

use oracle_client::ScriptedOracle;
use signaldesk_common::{
    DraftStatus, EngagementMetrics, ReviewAction, VerificationStatus,
};
use signaldesk_pipeline::{seed, DeskLog, MemoryChannel, ReviewDesk};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

fn harness() -> (ReviewDesk, Arc<MemoryChannel>) {
    harness_with(ScriptedOracle::new())
}

fn harness_with(oracle: ScriptedOracle) -> (ReviewDesk, Arc<MemoryChannel>) {
    let channel = Arc::new(MemoryChannel::new());
    (
        ReviewDesk::new(Arc::new(oracle), channel.clone()),
        channel,
    )
}

// =========================================================================
// Approve / reject
// =========================================================================

#[tokio::test]
async fn approve_from_needs_more_evidence_publishes() {
    let (review, channel) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    // d_2 is seeded as needs_more_evidence
    assert_eq!(
        state.draft("d_2").unwrap().status,
        DraftStatus::NeedsMoreEvidence
    );

    assert!(review.approve(&mut state, &log, "d_2").await);

    let draft = state.draft("d_2").unwrap();
    assert_eq!(draft.status, DraftStatus::Published);
    assert!(draft.published_at.is_some());
    assert_eq!(draft.audit_log.len(), 1);
    assert_eq!(draft.audit_log[0].action, ReviewAction::Approve);

    // content went out on the publish channel
    assert_eq!(channel.published(), vec![draft.content.clone()]);
}

#[tokio::test]
async fn approve_unknown_draft_is_a_noop() {
    let (review, channel) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    assert!(!review.approve(&mut state, &log, "d_missing").await);
    assert!(channel.published().is_empty());
}

#[tokio::test]
async fn approve_on_published_draft_only_appends_audit() {
    let (review, channel) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    assert!(review.approve(&mut state, &log, "d_1").await);
    assert!(!review.approve(&mut state, &log, "d_1").await);

    let draft = state.draft("d_1").unwrap();
    assert_eq!(draft.status, DraftStatus::Published);
    assert_eq!(draft.audit_log.len(), 2);
    // published once, not twice
    assert_eq!(channel.published().len(), 1);
}

#[tokio::test]
async fn reject_records_the_reason() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    assert!(review.reject(&mut state, &log, "d_1", Some("Low impact".to_string())));

    let draft = state.draft("d_1").unwrap();
    assert_eq!(draft.status, DraftStatus::Rejected);
    assert_eq!(
        draft.audit_log.last().unwrap().action,
        ReviewAction::Reject {
            reason: Some("Low impact".to_string())
        }
    );
}

#[tokio::test]
async fn retraction_note_on_rejected_draft_keeps_status() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    review.reject(&mut state, &log, "d_1", Some("Low impact".to_string()));
    // a second reject is record-keeping only
    assert!(!review.reject(&mut state, &log, "d_1", Some("Manual Retract".to_string())));

    let draft = state.draft("d_1").unwrap();
    assert_eq!(draft.status, DraftStatus::Rejected);
    assert_eq!(draft.audit_log.len(), 2);
    assert_eq!(
        draft.audit_log[1].action,
        ReviewAction::Reject {
            reason: Some("Manual Retract".to_string())
        }
    );
}

// =========================================================================
// Content edits
// =========================================================================

#[tokio::test]
async fn content_edits_do_not_touch_audit_log() {
    let (review, _) = harness();
    let mut state = seed::seed_state();

    assert!(review.edit(&mut state, "d_1", "tightened copy".to_string()));
    assert!(review.update_thread(&mut state, "d_1", vec!["1/".to_string(), "2/".to_string()]));
    assert!(review.update_counter_case(&mut state, "d_1", Some("could be priced in".to_string())));

    let draft = state.draft("d_1").unwrap();
    assert_eq!(draft.content, "tightened copy");
    assert_eq!(draft.thread_items.len(), 2);
    assert!(draft.audit_log.is_empty());
}

#[tokio::test]
async fn published_content_is_immutable() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    review.approve(&mut state, &log, "d_1").await;
    let before = state.draft("d_1").unwrap().content.clone();

    assert!(!review.edit(&mut state, "d_1", "rewrite after the fact".to_string()));
    assert_eq!(state.draft("d_1").unwrap().content, before);
}

// =========================================================================
// Regeneration
// =========================================================================

#[tokio::test]
async fn regenerate_increments_count_by_exactly_one() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    assert!(review
        .regenerate(&mut state, &log, "d_1", Some("less hype"))
        .await
        .unwrap());

    let draft = state.draft("d_1").unwrap();
    assert_eq!(draft.regeneration_count, 1);
    assert_eq!(draft.status, DraftStatus::Draft); // status untouched
    assert_eq!(
        draft.content,
        "New listing: $AIA goes live on Binance at 12:00 UTC."
    );

    review.regenerate(&mut state, &log, "d_1", None).await.unwrap();
    assert_eq!(state.draft("d_1").unwrap().regeneration_count, 2);
}

#[tokio::test]
async fn regenerate_failure_leaves_draft_untouched() {
    let oracle = ScriptedOracle::new();
    oracle.fail_on("generate_draft");
    let (review, _) = harness_with(oracle);
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    let before = state.draft("d_1").unwrap().clone();
    assert!(review
        .regenerate(&mut state, &log, "d_1", None)
        .await
        .is_err());

    let after = state.draft("d_1").unwrap();
    assert_eq!(after.regeneration_count, before.regeneration_count);
    assert_eq!(after.content, before.content);
}

#[tokio::test]
async fn regenerate_on_published_draft_is_a_noop() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    review.approve(&mut state, &log, "d_1").await;
    let regenerated = review
        .regenerate(&mut state, &log, "d_1", None)
        .await
        .unwrap();

    assert!(!regenerated);
    assert_eq!(state.draft("d_1").unwrap().regeneration_count, 0);
}

// =========================================================================
// Evidence and claims
// =========================================================================

#[tokio::test]
async fn toggling_a_star_twice_restores_the_original() {
    let (review, _) = harness();
    let mut state = seed::seed_state();

    assert!(review.toggle_star(&mut state, "sig_1", "ev_sig_1_0"));
    assert!(state.signal("sig_1").unwrap().evidence[0].starred);

    assert!(review.toggle_star(&mut state, "sig_1", "ev_sig_1_0"));
    assert!(!state.signal("sig_1").unwrap().evidence[0].starred);
}

#[tokio::test]
async fn star_toggle_on_unknown_ids_is_a_noop() {
    let (review, _) = harness();
    let mut state = seed::seed_state();

    assert!(!review.toggle_star(&mut state, "sig_1", "ev_missing"));
    assert!(!review.toggle_star(&mut state, "sig_missing", "ev_sig_1_0"));
}

#[tokio::test]
async fn claim_correction_amends_status_and_audits() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    assert!(review.correct_claim(
        &mut state,
        &log,
        "sig_1",
        "cl_sig_1_0",
        VerificationStatus::False,
    ));

    let claim = &state.signal("sig_1").unwrap().claims[0];
    assert_eq!(claim.status, VerificationStatus::False);
    assert_eq!(claim.manual_verified, Some(true));

    let draft = state.draft("d_1").unwrap();
    assert_eq!(
        draft.audit_log.last().unwrap().action,
        ReviewAction::Correct {
            claim_id: "cl_sig_1_0".to_string()
        }
    );
}

// =========================================================================
// Supplemental verification
// =========================================================================

#[tokio::test]
async fn supplemental_request_returns_advisory_finding() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    let finding = review
        .request_more_evidence(&mut state, &log, "sig_1", "is the listing date confirmed?")
        .await;

    assert!(finding.is_some());
    // advisory only: draft status untouched
    assert_eq!(state.draft("d_1").unwrap().status, DraftStatus::Draft);
}

#[tokio::test]
async fn supplemental_failure_is_swallowed() {
    let oracle = ScriptedOracle::new();
    oracle.fail_on("supplemental_verification");
    let (review, _) = harness_with(oracle);
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    let finding = review
        .request_more_evidence(&mut state, &log, "sig_1", "anything?")
        .await;
    assert!(finding.is_none());
}

// =========================================================================
// Post-publication record-keeping
// =========================================================================

#[tokio::test]
async fn publish_link_and_performance_attach_to_published_drafts() {
    let (review, _) = harness();
    let mut state = seed::seed_state();
    let log = DeskLog::new();

    review.approve(&mut state, &log, "d_1").await;

    assert!(review.record_publish_link(
        &mut state,
        "d_1",
        "https://x.com/desk/status/1".to_string(),
    ));
    assert!(review.record_performance(
        &mut state,
        "d_1",
        EngagementMetrics {
            impressions: 120_000,
            likes: 900,
            retweets: 210,
            bookmarks: 45,
        },
    ));

    let draft = state.draft("d_1").unwrap();
    assert_eq!(draft.tweet_url.as_deref(), Some("https://x.com/desk/status/1"));
    assert_eq!(draft.performance.unwrap().impressions, 120_000);
    assert!(matches!(
        draft.audit_log.last().unwrap().action,
        ReviewAction::PublishLink { .. }
    ));
}

#[tokio::test]
async fn checkpoint_appends_to_any_draft() {
    let (review, _) = harness();
    let mut state = seed::seed_state();

    assert!(review.checkpoint(&mut state, "d_2", Some("waiting on on-chain data".to_string())));
    assert!(matches!(
        state.draft("d_2").unwrap().audit_log.last().unwrap().action,
        ReviewAction::Checkpoint { .. }
    ));
}
