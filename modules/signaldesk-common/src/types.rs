use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Domain {
    #[serde(rename = "Crypto")]
    Crypto,
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "AI+Crypto")]
    AiCrypto,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Crypto => write!(f, "Crypto"),
            Domain::Ai => write!(f, "AI"),
            Domain::AiCrypto => write!(f, "AI+Crypto"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Rumor,
    Event,
    Narrative,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalMaturity {
    Rumor,
    Developing,
    Matured,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Fast,
    Slow,
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lane::Fast => write!(f, "fast"),
            Lane::Slow => write!(f, "slow"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Traffic,
    Research,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PublishLevel {
    Auto,
    Semi,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Confirmed,
    Partial,
    Unconfirmed,
    False,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::Confirmed => write!(f, "confirmed"),
            VerificationStatus::Partial => write!(f, "partial"),
            VerificationStatus::Unconfirmed => write!(f, "unconfirmed"),
            VerificationStatus::False => write!(f, "false"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    Draft,
    NeedsMoreEvidence,
    Approved,
    Rejected,
    Published,
}

impl DraftStatus {
    /// Terminal states permit no further status transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, DraftStatus::Published | DraftStatus::Rejected)
    }
}

impl std::fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftStatus::Draft => write!(f, "draft"),
            DraftStatus::NeedsMoreEvidence => write!(f, "needs_more_evidence"),
            DraftStatus::Approved => write!(f, "approved"),
            DraftStatus::Rejected => write!(f, "rejected"),
            DraftStatus::Published => write!(f, "published"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Bullish,
    Bearish,
    Neutral,
    Chaos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    New,
    Monitoring,
    Published,
    Archived,
    Retracted,
}

/// Shared low/medium/high scale (time sensitivity, discussion level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedReach {
    Low,
    Medium,
    High,
    Viral,
}

/// Source strength, 1 = official, 4 = community. Lower is stronger.
/// Serialized as the original wire strings "1".."4".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum SourceTier {
    #[serde(rename = "1")]
    Official,
    #[serde(rename = "2")]
    Tier1Media,
    #[serde(rename = "3")]
    Tier2Media,
    #[serde(rename = "4")]
    Community,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Event,
    Data,
    Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verifiability {
    Verifiable,
    Unverifiable,
}

// --- Claims and evidence ---

/// An atomic assertion extracted from a signal. Created once during
/// classification; status may be amended by operator action, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    pub claim_text: String,
    pub claim_type: ClaimType,
    pub entities: Vec<String>,
    pub verifiability: Verifiability,
    pub status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_verified: Option<bool>,
}

/// A grounding artifact behind a signal. `starred` is the only
/// post-creation mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub evidence_id: String,
    pub url: String,
    pub source_tier: SourceTier,
    pub title: String,
    pub snippet: String,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub starred: bool,
}

/// Raw grounding snippet returned by claim verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GroundingChunk {
    pub text: String,
    pub relevance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// --- Analysis, verdict, routing, scores ---

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisOutput {
    pub key_changes: String,
    pub market_impact: String,
    pub narrative_impact: String,
    pub affected_assets: Vec<String>,
    pub stance: Stance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stance_reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<String>,
    /// Signal strength on a 0-10 scale. `alpha_score * 10` is the impact
    /// score compared against the calibration gate.
    pub alpha_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_affinity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_would_change_mind: Option<String>,
}

impl AnalysisOutput {
    /// The 0-100 impact score used for gating and `scores.impact`.
    pub fn impact_score(&self) -> f64 {
        self.alpha_score * 10.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerificationStatus,
    pub confidence: f64,
    pub supporting_sources: Vec<String>,
    pub contradictions: Vec<String>,
    pub what_would_confirm: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Routing {
    pub lane: Lane,
    pub track: Track,
    pub publish_level: PublishLevel,
    pub risk_score: f64,
    pub required_labels: Vec<String>,
    pub risk_notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_reach: Option<ProjectedReach>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scores {
    pub novelty: f64,
    pub credibility: f64,
    pub discussion: f64,
    pub impact: f64,
    pub total: f64,
}

// --- Signal ---

/// An observed, classified event/rumor/narrative/data point.
/// `signal_id` is immutable and unique; claim and evidence ids are prefixed
/// by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub signal_id: String,
    pub story_id: String,
    pub cluster_id: String,
    pub topic: String,
    pub domain: Domain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_sector: Option<String>,
    pub signal_type: SignalType,
    pub maturity: SignalMaturity,
    pub time_sensitivity: Level,
    pub discussion_level: Level,
    pub entities: Vec<String>,
    pub claims: Vec<Claim>,
    pub evidence: Vec<Evidence>,
    pub analysis: AnalysisOutput,
    pub verdict: Verdict,
    pub routing: Routing,
    pub scores: Scores,
    pub created_at: DateTime<Utc>,
    pub config_version: String,
}

// --- Draft ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub impressions: u64,
    pub likes: u64,
    pub retweets: u64,
    pub bookmarks: u64,
}

/// One entry in a draft's append-only audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAudit {
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub action: ReviewAction,
}

impl ReviewAudit {
    pub fn now(action: ReviewAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
        }
    }
}

/// The closed vocabulary of review decisions. Content-only edits do not
/// produce audit entries; decisions do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Edit,
    Merge {
        from_story: String,
    },
    Split {
        to_story: String,
    },
    Correct {
        claim_id: String,
    },
    Regenerate {
        #[serde(skip_serializing_if = "Option::is_none")]
        feedback: Option<String>,
    },
    Checkpoint {
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    PublishLink {
        url: String,
    },
}

/// The publishable artifact derived from a Signal. Once published, content
/// is immutable except for the publish link and appended performance metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub draft_id: String,
    pub signal_id: String,
    pub track: Track,
    pub status: DraftStatus,
    pub content: String,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_checksum: Option<String>,
    #[serde(default)]
    pub thread_items: Vec<String>,
    pub audit_log: Vec<ReviewAudit>,
    pub regeneration_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<EngagementMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub config_version: String,
}

// --- Story ---

/// A cluster of signals believed to report the same underlying situation.
/// Holds member signal ids by reference; every member's `story_id` points
/// back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub story_id: String,
    pub title: String,
    pub status: StoryStatus,
    pub signals: Vec<String>,
    pub maturity: SignalMaturity,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distilled_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub latest_update_at: DateTime<Utc>,
}

// --- Calibration ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentEntry {
    pub kind: String,
    pub delta: f64,
    pub timestamp: DateTime<Utc>,
}

/// Process-wide gating tunables. Mutated only by the calibration engine,
/// always with an appended adjustment entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationState {
    pub impact_threshold: f64,
    pub credibility_bias: f64,
    pub last_calibrated_at: DateTime<Utc>,
    pub adjustment_log: Vec<AdjustmentEntry>,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            impact_threshold: 60.0,
            credibility_bias: 0.05,
            last_calibrated_at: Utc::now(),
            adjustment_log: Vec::new(),
        }
    }
}

// --- Display-only operational state ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Idle,
    Running,
    Boosted,
    Degraded,
}

/// A periodic ingestion task as shown on the dashboard. Display-only:
/// nothing in the core schedules or executes these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    pub id: String,
    pub label: String,
    pub interval_minutes: u32,
    pub next_run: DateTime<Utc>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetric {
    pub node: String,
    pub latency_ms: u64,
    pub success: bool,
}

/// Per-run observability sample. Diagnostic only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemMetric {
    pub latency_ms: u64,
    pub success: bool,
    pub node_breakdown: Vec<NodeMetric>,
    pub timestamp: DateTime<Utc>,
}
