//! Oracle request/response types.
//!
//! Everything an oracle backend returns is shape-stable but content
//! non-deterministic; the schemars derives feed structured-output schemas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use signaldesk_common::{
    Domain, GroundingChunk, Level, SignalType, VerificationStatus,
};

/// What classification makes of one raw input.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Classification {
    pub topic: String,
    pub domain: Domain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_sector: Option<String>,
    pub signal_type: SignalType,
    pub entities: Vec<String>,
    pub time_sensitivity: Level,
    pub discussion_level: Level,
}

/// Evidentiary verification of a topic against its entities.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Verification {
    pub status: VerificationStatus,
    /// 0-1 confidence in the verdict.
    pub confidence: f64,
    pub sources: Vec<String>,
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    pub what_would_confirm: String,
}

/// The polished draft body returned by generation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftOutput {
    pub content: String,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_checksum: Option<String>,
    #[serde(default)]
    pub thread_items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UrlValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Advisory result of a supplemental verification pass. Never changes
/// pipeline state on its own.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SupplementalFinding {
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<String>,
}
