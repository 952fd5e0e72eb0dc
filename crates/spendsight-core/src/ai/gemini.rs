//! Gemini backend implementation
//!
//! HTTP client for a Google generative-language-compatible API. Prompts ask
//! for strict JSON; responses go through the fallible decode step in
//! `parsing` so malformed output surfaces as a tagged failure instead of a
//! made-up default.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::parsing::{parse_category, parse_health_assessment, parse_insights};
use super::types::{
    ExpenseSummary, HealthAssessment, HealthMetrics, SpendingInsight, VALID_CATEGORIES,
};
use super::Collaborator;

use async_trait::async_trait;

const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemma-3-27b-it";

/// Backend for a Gemini-compatible `generateContent` API
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables.
    ///
    /// Requires `GEMINI_API_KEY`; `GEMINI_HOST` and `GEMINI_MODEL` are
    /// optional overrides.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())?;
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(&host, &api_key, &model))
    }

    /// Create a new instance with a different model.
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: model.to_string(),
        }
    }

    /// Send a prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| Error::InvalidData("Empty candidate list from Gemini".into()))?;

        debug!(model = %self.model, chars = text.len(), "Gemini response received");
        Ok(text)
    }
}

/// Request to the generateContent API
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Collaborator for GeminiBackend {
    async fn categorize(&self, name: &str, amount: f64) -> Result<String> {
        let prompt = format!(
            "You are an assistant that categorizes personal expenses.\n\n\
             Expense details:\n- Item: \"{}\"\n- Amount: {:.2}\n\n\
             Available categories: {}\n\n\
             Respond with ONLY the category name that best fits this expense.",
            name,
            amount,
            VALID_CATEGORIES.join(", ")
        );

        let response = self.generate(&prompt).await?;
        parse_category(&response, &VALID_CATEGORIES)
    }

    async fn generate_insights(&self, summary: &ExpenseSummary) -> Result<Vec<SpendingInsight>> {
        let prompt = format!(
            "You are a helpful financial assistant. Analyze the expense summary and \
             provide actionable insights.\n\nExpense summary:\n{}\n\n\
             Respond with a JSON array in this exact shape:\n\
             [{{\"message\": \"insight text\", \"data\": {{\"category\": \"name\", \"amount\": 0.0}}}}]\n\n\
             Focus on spending patterns, unusual expenses, budget recommendations, and \
             savings opportunities. Respond with JSON only.",
            serde_json::to_string_pretty(summary)?
        );

        let response = self.generate(&prompt).await?;
        parse_insights(&response)
    }

    async fn score_health(&self, metrics: &HealthMetrics) -> Result<HealthAssessment> {
        let prompt = format!(
            "Analyze this month's financial health from these metrics and provide a \
             score from 0 to 100:\n\n{}\n\n\
             Respond in strict JSON:\n\
             {{\"health_score\": 0.0, \"grade\": \"A\", \"factors\": [\"...\"], \
             \"recommendations\": [\"...\"]}}",
            serde_json::to_string_pretty(metrics)?
        );

        let response = self.generate(&prompt).await?;
        parse_health_assessment(&response)
    }

    async fn health_check(&self) -> bool {
        // A tiny generation round-trip; any successful response counts.
        self.generate("Reply with the single word: ok").await.is_ok()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
