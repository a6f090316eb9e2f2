//! In-memory oracle for testing. Canned outputs, per-stage failure
//! injection, and call recording. No network required.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use signaldesk_common::{
    AnalysisOutput, Domain, Lane, Level, PublishLevel, Routing, Signal, SignalType, Stance, Story,
    Track, VerificationStatus,
};

use crate::oracle::IntelligenceOracle;
use crate::types::{
    Classification, DraftOutput, SupplementalFinding, UrlValidation, Verification,
};

pub struct ScriptedOracle {
    pub classification: Classification,
    pub verification: Verification,
    pub analysis: AnalysisOutput,
    pub routing: Routing,
    pub draft: DraftOutput,
    pub url_validation: UrlValidation,
    pub poster_url: String,
    pub supplemental: SupplementalFinding,
    pub distilled: String,

    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self {
            classification: Classification {
                topic: "Binance Lists New AI Agent Token".to_string(),
                domain: Domain::AiCrypto,
                sub_sector: Some("AI Agents".to_string()),
                signal_type: SignalType::Event,
                entities: vec!["Binance".to_string(), "AIAgent".to_string()],
                time_sensitivity: Level::High,
                discussion_level: Level::High,
            },
            verification: Verification {
                status: VerificationStatus::Confirmed,
                confidence: 0.9,
                sources: vec!["https://binance.com/announcement".to_string()],
                grounding_chunks: vec![],
                what_would_confirm: "Official listing page goes live".to_string(),
            },
            analysis: AnalysisOutput {
                key_changes: "New listing announced".to_string(),
                market_impact: "Liquidity influx expected".to_string(),
                narrative_impact: "AI agent narrative strengthens".to_string(),
                affected_assets: vec!["AIA".to_string()],
                stance: Stance::Bullish,
                stance_reasoning: None,
                recommended_action: None,
                alpha_score: 9.0,
                narrative_affinity: None,
                what_would_change_mind: None,
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
            draft: DraftOutput {
                content: "New listing: $AIA goes live on Binance at 12:00 UTC.".to_string(),
                labels: vec!["Confirmed".to_string(), "Listing".to_string()],
                counter_case: None,
                fact_checksum: Some("AIA/Binance/12:00UTC".to_string()),
                thread_items: vec![],
            },
            url_validation: UrlValidation {
                valid: true,
                reason: None,
            },
            poster_url: "https://posters.example/aia.png".to_string(),
            supplemental: SupplementalFinding {
                summary: "No contradicting evidence found.".to_string(),
                sources: vec![],
            },
            distilled: "The AIA listing story in one paragraph.".to_string(),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation fail until cleared.
    pub fn fail_on(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Operations invoked so far, in order (for assertions).
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(op) {
            bail!("scripted failure: {op}");
        }
        Ok(())
    }
}

#[async_trait]
impl IntelligenceOracle for ScriptedOracle {
    async fn classify(&self, _raw_text: &str) -> Result<Classification> {
        self.record("classify")?;
        Ok(self.classification.clone())
    }

    async fn verify_claims(&self, _topic: &str, _entities: &[String]) -> Result<Verification> {
        self.record("verify_claims")?;
        Ok(self.verification.clone())
    }

    async fn analyze_impact(
        &self,
        _topic: &str,
        _raw_text: &str,
        _prior_summary: &str,
    ) -> Result<AnalysisOutput> {
        self.record("analyze_impact")?;
        Ok(self.analysis.clone())
    }

    async fn judge(
        &self,
        _classification: &Classification,
        _verification: &Verification,
        _analysis: &AnalysisOutput,
    ) -> Result<Routing> {
        self.record("judge")?;
        Ok(self.routing.clone())
    }

    async fn generate_draft(
        &self,
        _signal: &Signal,
        _analysis: &AnalysisOutput,
        _feedback: Option<&str>,
    ) -> Result<DraftOutput> {
        self.record("generate_draft")?;
        Ok(self.draft.clone())
    }

    async fn validate_url(&self, _url: &str) -> Result<UrlValidation> {
        self.record("validate_url")?;
        Ok(self.url_validation.clone())
    }

    async fn generate_poster(&self, _topic: &str, _market_impact: &str) -> Result<String> {
        self.record("generate_poster")?;
        Ok(self.poster_url.clone())
    }

    async fn supplemental_verification(
        &self,
        _topic: &str,
        _question: &str,
    ) -> Result<SupplementalFinding> {
        self.record("supplemental_verification")?;
        Ok(self.supplemental.clone())
    }

    async fn distill_story(&self, _story: &Story, _signals: &[Signal]) -> Result<String> {
        self.record("distill_story")?;
        Ok(self.distilled.clone())
    }

    async fn deep_dive_report(&self, _story: &Story, _signals: &[Signal]) -> Result<String> {
        self.record("deep_dive_report")?;
        Ok(self.distilled.clone())
    }
}
