mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::Engine;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use signaldesk_common::{AnalysisOutput, Routing, Signal, Story};

use crate::oracle::IntelligenceOracle;
use crate::types::{
    Classification, DraftOutput, SupplementalFinding, UrlValidation, Verification,
};
use client::GeminiClient;
use types::{GenerateRequest, GenerationConfig, ImageInstance, ImageParameters, ImageRequest};

const IMAGE_MODEL: &str = "imagen-3.0-generate-002";

const CLASSIFIER_PROMPT: &str = r#"You are the intake classifier for a market/news signal desk covering crypto and AI.

Given one raw input (a headline, post, or pasted text, possibly with a URL), classify it:
- topic: a short, specific headline for what happened
- domain: "Crypto", "AI", or "AI+Crypto"
- sub_sector: the narrower sector if determinable (L2, DeFi, agents, infra, ...)
- signal_type: "rumor" (unconfirmed chatter), "event" (something happened), "narrative" (an interpretation gaining traction), or "data" (a measurable observation)
- entities: tickers, companies, protocols, and people named or clearly implied
- time_sensitivity and discussion_level: "low", "medium", or "high"

Be literal. Do not speculate beyond the text."#;

const VERIFIER_PROMPT: &str = r#"You are the verification agent for a signal desk.

Given a topic and its entities, search your knowledge for confirming or contradicting evidence:
- status: "confirmed", "partial", "unconfirmed", or "false"
- confidence: 0 to 1
- sources: URLs of the strongest sources you can cite
- grounding_chunks: for each source, a short snippet with its uri, title, and a 0-1 relevance
- what_would_confirm: the single strongest piece of evidence that would settle the claim

Prefer official announcements over media, media over community chatter. Never invent URLs."#;

const ANALYST_PROMPT: &str = r#"You are the impact analyst for a market/news signal desk.

Given a topic, the raw input, and any prior story context, assess:
- key_changes: what is new versus the prior context
- market_impact and narrative_impact: one tight paragraph each
- affected_assets: tickers/protocols that move on this
- stance: "bullish", "bearish", "neutral", or "chaos", with stance_reasoning
- recommended_action: what the desk should do next, if anything
- alpha_score: 0-10 signal strength (10 = drop everything)
- what_would_change_mind: the observation that would flip the stance

Score conservatively. Most inputs are a 3-6."#;

const JUDGE_PROMPT: &str = r#"You are the routing judge for a signal desk. You receive the classification, verification, and impact analysis for one signal as JSON.

Decide:
- lane: "fast" (publish window is minutes/hours) or "slow" (research pace)
- track: "traffic" (timely post) or "research" (deep-dive material)
- publish_level: "auto", "semi", or "manual" review requirement
- risk_score: 0-100 reputational/accuracy risk
- required_labels: labels the post must carry (e.g. "Rumor", "Official")
- risk_notes: concrete risks the reviewer should weigh
- projected_reach: "low", "medium", "high", or "viral"

Unverified high-impact claims always get "manual" and a "Rumor" label."#;

const DRAFT_PROMPT: &str = r#"You are the drafting agent for a signal desk. You receive an assembled signal and its impact analysis as JSON, and optionally operator feedback on a previous draft.

Write the publishable post:
- content: the post body, tight and factual, no hedging filler
- labels: the labels it should carry
- counter_case: the strongest argument the post is wrong, if one exists
- fact_checksum: a short digest of the load-bearing facts (numbers, names, dates)
- thread_items: follow-up posts if the material warrants a thread, else empty

If operator feedback is present, it overrides your defaults."#;

const URL_VALIDATOR_PROMPT: &str = r#"You assess whether a URL is a plausible, credible source link for a market/news signal desk. Judge the host's reputation and whether the path looks like a real article or announcement. Return valid=false with a short reason for link shorteners, paywalled stubs, known-fabricated hosts, or obvious tracking bait."#;

const SUPPLEMENTAL_PROMPT: &str = r#"You are handling a reviewer's follow-up question about a signal. Answer the question directly against the topic, citing sources where you can. This is advisory material for the reviewer, not published content."#;

const DISTILL_PROMPT: &str = r#"You condense a story cluster for a signal desk. You receive the story and its member signals as JSON. Write one briefing paragraph: what the situation is, how it developed across the signals, and where it stands now."#;

const DEEP_DIVE_PROMPT: &str = r#"You write internal research reports for a signal desk. You receive a story and its member signals as JSON. Produce a structured report: situation, timeline of signals, strength of evidence, open questions, and what to watch."#;

/// Production oracle backed by the Gemini REST API.
pub struct GeminiOracle {
    model: String,
    client: GeminiClient,
}

impl GeminiOracle {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            model: model.to_string(),
            client: GeminiClient::new(api_key),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Structured-output call: constrain the response to T's JSON schema
    /// and deserialize it.
    async fn extract<T: JsonSchema + DeserializeOwned>(
        &self,
        system: &str,
        user: String,
    ) -> Result<T> {
        let request = GenerateRequest::new(user).system(system).config(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema::<T>()),
            temperature: Some(0.0),
        });

        let response = self.client.generate(&self.model, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| anyhow!("empty oracle response"))?;

        serde_json::from_str(&text).map_err(|e| anyhow!("oracle response did not parse: {e}"))
    }

    /// Free-text call.
    async fn prose(&self, system: &str, user: String) -> Result<String> {
        let request = GenerateRequest::new(user).system(system).config(GenerationConfig {
            temperature: Some(0.2),
            ..GenerationConfig::default()
        });

        let response = self.client.generate(&self.model, &request).await?;
        response
            .text()
            .ok_or_else(|| anyhow!("empty oracle response"))
    }
}

/// Root JSON schema for T, with the meta `$schema` key stripped (the
/// Gemini API rejects it).
fn response_schema<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
    let mut value = serde_json::to_value(schema).unwrap_or_default();
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
    }
    value
}

#[async_trait]
impl IntelligenceOracle for GeminiOracle {
    async fn classify(&self, raw_text: &str) -> Result<Classification> {
        self.extract(CLASSIFIER_PROMPT, format!("Raw input:\n\n{raw_text}"))
            .await
    }

    async fn verify_claims(&self, topic: &str, entities: &[String]) -> Result<Verification> {
        let user = format!("Topic: {topic}\nEntities: {}", entities.join(", "));
        self.extract(VERIFIER_PROMPT, user).await
    }

    async fn analyze_impact(
        &self,
        topic: &str,
        raw_text: &str,
        prior_summary: &str,
    ) -> Result<AnalysisOutput> {
        let user = format!(
            "Topic: {topic}\n\nPrior story context: {prior}\n\nRaw input:\n{raw_text}",
            prior = if prior_summary.is_empty() {
                "(none)"
            } else {
                prior_summary
            }
        );
        self.extract(ANALYST_PROMPT, user).await
    }

    async fn judge(
        &self,
        classification: &Classification,
        verification: &Verification,
        analysis: &AnalysisOutput,
    ) -> Result<Routing> {
        let user = format!(
            "Classification:\n{}\n\nVerification:\n{}\n\nAnalysis:\n{}",
            serde_json::to_string_pretty(classification)?,
            serde_json::to_string_pretty(verification)?,
            serde_json::to_string_pretty(analysis)?,
        );
        self.extract(JUDGE_PROMPT, user).await
    }

    async fn generate_draft(
        &self,
        signal: &Signal,
        analysis: &AnalysisOutput,
        feedback: Option<&str>,
    ) -> Result<DraftOutput> {
        let mut user = format!(
            "Signal:\n{}\n\nAnalysis:\n{}",
            serde_json::to_string_pretty(signal)?,
            serde_json::to_string_pretty(analysis)?,
        );
        if let Some(feedback) = feedback {
            user.push_str(&format!("\n\nOperator feedback:\n{feedback}"));
        }
        self.extract(DRAFT_PROMPT, user).await
    }

    async fn validate_url(&self, url: &str) -> Result<UrlValidation> {
        self.extract(URL_VALIDATOR_PROMPT, format!("URL: {url}"))
            .await
    }

    async fn generate_poster(&self, topic: &str, market_impact: &str) -> Result<String> {
        let prompt = format!(
            "Minimal editorial poster for a market intelligence story. \
             Topic: {topic}. Mood: {market_impact}. \
             Abstract, high contrast, no text."
        );
        let request = ImageRequest {
            instances: vec![ImageInstance { prompt }],
            parameters: ImageParameters { sample_count: 1 },
        };

        let response = self.client.predict_image(IMAGE_MODEL, &request).await?;
        let prediction = response
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no poster image returned"))?;

        // Sanity-check the payload before handing out a data URL.
        base64::engine::general_purpose::STANDARD
            .decode(&prediction.bytes_base64)
            .map_err(|e| anyhow!("poster payload is not valid base64: {e}"))?;

        let mime = prediction.mime_type.as_deref().unwrap_or("image/png");
        Ok(format!("data:{mime};base64,{}", prediction.bytes_base64))
    }

    async fn supplemental_verification(
        &self,
        topic: &str,
        question: &str,
    ) -> Result<SupplementalFinding> {
        let user = format!("Topic: {topic}\nReviewer question: {question}");
        self.extract(SUPPLEMENTAL_PROMPT, user).await
    }

    async fn distill_story(&self, story: &Story, signals: &[Signal]) -> Result<String> {
        let user = format!(
            "Story:\n{}\n\nSignals:\n{}",
            serde_json::to_string_pretty(story)?,
            serde_json::to_string_pretty(signals)?,
        );
        self.prose(DISTILL_PROMPT, user).await
    }

    async fn deep_dive_report(&self, story: &Story, signals: &[Signal]) -> Result<String> {
        let user = format!(
            "Story:\n{}\n\nSignals:\n{}",
            serde_json::to_string_pretty(story)?,
            serde_json::to_string_pretty(signals)?,
        );
        self.prose(DEEP_DIVE_PROMPT, user).await
    }
}
