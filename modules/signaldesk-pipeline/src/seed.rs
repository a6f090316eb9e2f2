//! Fixed seed state used when no persisted blob exists.

use chrono::{Duration, Utc};

use signaldesk_common::{
    AnalysisOutput, Claim, ClaimType, Domain, Draft, DraftStatus, Evidence, Lane, Level,
    PublishLevel, Routing, Scores, Signal, SignalMaturity, SignalType, SourceTier, Stance, Story,
    StoryStatus, Track, Verdict, Verifiability, VerificationStatus, CONFIG_VERSION,
};

use crate::store::DeskState;

pub fn seed_state() -> DeskState {
    let now = Utc::now();

    let listing_signal = Signal {
        signal_id: "sig_1".to_string(),
        story_id: "story_1".to_string(),
        cluster_id: "cluster_1".to_string(),
        topic: "Binance Lists New AI Agent Token".to_string(),
        domain: Domain::AiCrypto,
        sub_sector: None,
        signal_type: SignalType::Event,
        maturity: SignalMaturity::Matured,
        time_sensitivity: Level::High,
        discussion_level: Level::High,
        entities: vec![
            "Binance".to_string(),
            "AIAgent".to_string(),
            "Solana".to_string(),
        ],
        claims: vec![Claim {
            claim_id: "cl_sig_1_0".to_string(),
            claim_text: "Trading starts at 12:00 UTC".to_string(),
            claim_type: ClaimType::Data,
            entities: vec!["Binance".to_string()],
            verifiability: Verifiability::Verifiable,
            status: VerificationStatus::Confirmed,
            manual_verified: None,
        }],
        evidence: vec![Evidence {
            evidence_id: "ev_sig_1_0".to_string(),
            url: "https://binance.com/announcement".to_string(),
            source_tier: SourceTier::Official,
            title: "New Listing".to_string(),
            snippet: "AIAgent (AIA) listing details...".to_string(),
            captured_at: now,
            starred: false,
        }],
        analysis: AnalysisOutput {
            key_changes: "First exchange listing for the AIA token".to_string(),
            market_impact: "Massive liquidity influx expected for the Solana AI ecosystem"
                .to_string(),
            narrative_impact: "Reinforces the AI agent trade".to_string(),
            affected_assets: vec!["AIA".to_string(), "SOL".to_string()],
            stance: Stance::Bullish,
            stance_reasoning: None,
            recommended_action: None,
            alpha_score: 9.5,
            narrative_affinity: None,
            what_would_change_mind: None,
        },
        verdict: Verdict {
            status: VerificationStatus::Confirmed,
            confidence: 0.98,
            supporting_sources: vec!["https://binance.com/announcement".to_string()],
            contradictions: vec![],
            what_would_confirm: vec![],
        },
        routing: Routing {
            lane: Lane::Fast,
            track: Track::Traffic,
            publish_level: PublishLevel::Semi,
            risk_score: 10.0,
            required_labels: vec!["Official".to_string()],
            risk_notes: vec![],
            projected_reach: None,
        },
        scores: Scores {
            novelty: 90.0,
            credibility: 100.0,
            discussion: 85.0,
            impact: 95.0,
            total: 92.0,
        },
        created_at: now,
        config_version: CONFIG_VERSION.to_string(),
    };

    let l2_signal = Signal {
        signal_id: "sig_2".to_string(),
        story_id: "story_2".to_string(),
        cluster_id: "cluster_2".to_string(),
        topic: "Ethereum L2 Transaction Spike Analysis".to_string(),
        domain: Domain::Crypto,
        sub_sector: None,
        signal_type: SignalType::Data,
        maturity: SignalMaturity::Developing,
        time_sensitivity: Level::Medium,
        discussion_level: Level::Medium,
        entities: vec![
            "Ethereum".to_string(),
            "Base".to_string(),
            "L2".to_string(),
        ],
        claims: vec![],
        evidence: vec![],
        analysis: AnalysisOutput {
            key_changes: "L2 transaction volume decoupling from L1 costs".to_string(),
            market_impact: "Macro view on L2 efficiency and data availability adoption"
                .to_string(),
            narrative_impact: "Value-capture debate heats up".to_string(),
            affected_assets: vec!["ETH".to_string()],
            stance: Stance::Neutral,
            stance_reasoning: None,
            recommended_action: None,
            alpha_score: 7.0,
            narrative_affinity: None,
            what_would_change_mind: None,
        },
        verdict: Verdict {
            status: VerificationStatus::Partial,
            confidence: 0.7,
            supporting_sources: vec![],
            contradictions: vec![],
            what_would_confirm: vec!["On-chain verification".to_string()],
        },
        routing: Routing {
            lane: Lane::Slow,
            track: Track::Research,
            publish_level: PublishLevel::Manual,
            risk_score: 25.0,
            required_labels: vec!["Deep Dive".to_string()],
            risk_notes: vec![],
            projected_reach: None,
        },
        scores: Scores {
            novelty: 60.0,
            credibility: 80.0,
            discussion: 40.0,
            impact: 70.0,
            total: 62.0,
        },
        created_at: now - Duration::hours(1),
        config_version: CONFIG_VERSION.to_string(),
    };

    let listing_draft = Draft {
        draft_id: "d_1".to_string(),
        signal_id: "sig_1".to_string(),
        track: Track::Traffic,
        status: DraftStatus::Draft,
        content: "🚨 New Listing: Binance adds $AIAgent. Trading starts 12:00 UTC. \
                  Massive liquidity influx expected for Solana AI ecosystem."
            .to_string(),
        labels: vec!["Confirmed".to_string(), "Listing".to_string()],
        counter_case: None,
        fact_checksum: None,
        thread_items: vec![],
        audit_log: vec![],
        regeneration_count: 0,
        performance: None,
        tweet_url: None,
        published_at: None,
        created_at: now,
        config_version: CONFIG_VERSION.to_string(),
    };

    let l2_draft = Draft {
        draft_id: "d_2".to_string(),
        signal_id: "sig_2".to_string(),
        track: Track::Research,
        status: DraftStatus::NeedsMoreEvidence,
        content: "Ethereum L2 activity is decoupling from L1 costs. Data shows Base \
                  transaction volume exceeding L1, but where is the value capture?"
            .to_string(),
        labels: vec!["On-chain".to_string(), "Research".to_string()],
        counter_case: Some(
            "L2 activity might be heavily driven by sybil/bot interactions rather than \
             organic growth."
                .to_string(),
        ),
        fact_checksum: None,
        thread_items: vec![],
        audit_log: vec![],
        regeneration_count: 0,
        performance: None,
        tweet_url: None,
        published_at: None,
        created_at: now,
        config_version: CONFIG_VERSION.to_string(),
    };

    let stories = vec![
        Story {
            story_id: "story_1".to_string(),
            title: "AIAgent Token Ecosystem Launch".to_string(),
            status: StoryStatus::Monitoring,
            signals: vec!["sig_1".to_string()],
            maturity: SignalMaturity::Matured,
            summary: "Ongoing launch tracking for AIAgent ecosystem across multiple chains."
                .to_string(),
            distilled_note: None,
            poster_url: None,
            video_url: None,
            latest_update_at: now,
        },
        Story {
            story_id: "story_2".to_string(),
            title: "Ethereum L2 Scalability Trends 2024".to_string(),
            status: StoryStatus::New,
            signals: vec!["sig_2".to_string()],
            maturity: SignalMaturity::Developing,
            summary: "Macro view on L2 efficiency and data availability adoption.".to_string(),
            distilled_note: None,
            poster_url: None,
            video_url: None,
            latest_update_at: now,
        },
    ];

    DeskState {
        signals: vec![listing_signal, l2_signal],
        drafts: vec![listing_draft, l2_draft],
        stories,
    }
}
