//! The capability seam between the desk and whatever produces its answers.
//!
//! The pipeline depends on this trait, never on a backend. Implementations:
//! `GeminiOracle` (production) and `ScriptedOracle` (deterministic tests —
//! no network, no API key, `cargo test` in seconds).

use anyhow::Result;
use async_trait::async_trait;

use signaldesk_common::{AnalysisOutput, Routing, Signal, SourceTier, Story};

use crate::tier;
use crate::types::{
    Classification, DraftOutput, SupplementalFinding, UrlValidation, Verification,
};

#[async_trait]
pub trait IntelligenceOracle: Send + Sync {
    /// Parse one raw input into a classification.
    async fn classify(&self, raw_text: &str) -> Result<Classification>;

    /// Search for evidence confirming or contradicting the topic.
    async fn verify_claims(&self, topic: &str, entities: &[String]) -> Result<Verification>;

    /// Assess market/narrative impact. `prior_summary` is the matched
    /// story's summary, or empty for a fresh topic.
    async fn analyze_impact(
        &self,
        topic: &str,
        raw_text: &str,
        prior_summary: &str,
    ) -> Result<AnalysisOutput>;

    /// Final routing decision over the three upstream outputs.
    async fn judge(
        &self,
        classification: &Classification,
        verification: &Verification,
        analysis: &AnalysisOutput,
    ) -> Result<Routing>;

    /// Produce the publishable draft body for an assembled signal.
    /// `feedback` carries operator notes on regeneration.
    async fn generate_draft(
        &self,
        signal: &Signal,
        analysis: &AnalysisOutput,
        feedback: Option<&str>,
    ) -> Result<DraftOutput>;

    /// Check a source link's credibility. Advisory: a failed validation
    /// never aborts ingestion.
    async fn validate_url(&self, url: &str) -> Result<UrlValidation>;

    /// Resolve a URL to its source tier. Deterministic whitelist lookup;
    /// backends share the default.
    fn url_tier(&self, url: &str) -> SourceTier {
        tier::url_tier(url)
    }

    /// Best-effort poster image for a new story. Returns a URL.
    async fn generate_poster(&self, topic: &str, market_impact: &str) -> Result<String>;

    /// Operator-requested follow-up verification. Advisory only.
    async fn supplemental_verification(
        &self,
        topic: &str,
        question: &str,
    ) -> Result<SupplementalFinding>;

    /// Condense a story and its member signals into a briefing note.
    async fn distill_story(&self, story: &Story, signals: &[Signal]) -> Result<String>;

    /// Long-form research report over a story.
    async fn deep_dive_report(&self, story: &Story, signals: &[Signal]) -> Result<String>;
}
