//! Wire types for the Gemini REST API.

use serde::{Deserialize, Serialize};

// --- generateContent ---

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(user_text)],
            system_instruction: None,
            generation_config: None,
        }
    }

    pub fn system(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::bare(text));
        self
    }

    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }

    fn bare(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

// --- image prediction ---

#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub instances: Vec<ImageInstance>,
    pub parameters: ImageParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageParameters {
    #[serde(rename = "sampleCount")]
    pub sample_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub predictions: Vec<ImagePrediction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagePrediction {
    #[serde(rename = "bytesBase64Encoded")]
    pub bytes_base64: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
}
