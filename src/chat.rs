//! Chat assistant backed by an external generative-language API.
//!
//! The assistant is a pass-through: a fixed system instruction carrying the
//! caller's dashboard context, plus the user's message, posted to the
//! `generateContent` endpoint. Failures never surface as errors to the
//! caller; they become a fixed apology string and an `error!` log line.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error as ThisError;
use tracing::{debug, error};

use crate::Config;

// ---

pub const NOT_CONFIGURED_REPLY: &str =
    "Gemini API key is not configured. Please add it to your environment variables.";

pub const FAILURE_REPLY: &str =
    "I encountered an error while processing your request. Please try again.";

const TEMPERATURE: f64 = 0.7;

#[derive(Debug, ThisError)]
enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("response carried no text")]
    EmptyResponse,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Clone)]
pub struct ChatAssistant {
    // ---
    client: Client,
    api_key: Option<String>,
    model: String,
    api_url: String,
}

impl ChatAssistant {
    // ---
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: cfg.gemini_api_key.clone(),
            model: cfg.gemini_model.clone(),
            api_url: cfg.gemini_api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Answer `message` given the dashboard `context`.
    pub async fn reply(&self, message: &str, context: &Value) -> String {
        // ---
        let Some(api_key) = self.api_key.as_deref() else {
            return NOT_CONFIGURED_REPLY.to_string();
        };

        match self.generate(api_key, message, context).await {
            Ok(text) => text,
            Err(e) => {
                error!("Chat assistant error: {}", e);
                FAILURE_REPLY.to_string()
            }
        }
    }

    async fn generate(&self, api_key: &str, message: &str, context: &Value) -> Result<String, ChatError> {
        // ---
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_instruction(context) }] },
            "contents": [{ "role": "user", "parts": [{ "text": message }] }],
            "generationConfig": { "temperature": TEMPERATURE },
        });

        debug!("Posting chat message ({} chars) to {}", message.len(), url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or(ChatError::EmptyResponse)
    }
}

/// System prompt framing the assistant and embedding the dashboard context.
pub fn system_instruction(context: &Value) -> String {
    format!(
        r#"You are the JalSetu AI Assistant, a specialized GovTech decision support system for drought management in India.
You have access to real-time data about villages, water stress indices (WSI), rainfall deviation, and tanker fleet status.

Current Context:
{context}

Guidelines:
1. Be professional, data-driven, and helpful to government officials.
2. Use terms like "Block", "District", "Gram Panchayat" appropriately.
3. Provide actionable recommendations (e.g., "Deploy 2 tankers to Village X due to 90% WSI").
4. If asked about predictions, explain the reasoning (e.g., "Based on groundwater depletion velocity of -2.1m/year").
5. Keep responses concise and formatted with markdown."#
    )
}
