//! Generative-AI collaborator abstraction
//!
//! This module isolates the external AI service behind a backend-agnostic
//! interface. Three rules govern every call:
//!
//! - each call carries a hard deadline, so a hanging collaborator can never
//!   stall a request;
//! - a timeout or transport failure is reported as *unavailable*, which is
//!   distinct from the collaborator legitimately returning nothing;
//! - every failure degrades to the deterministic rule-based strategy and is
//!   logged - it never surfaces as a request failure.
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, rules, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for the gemini backend)
//! - `GEMINI_HOST`: API host override (default: Google generative language API)
//! - `GEMINI_MODEL`: Model name (default: gemma-3-27b-it)

mod fallback;
mod gemini;
mod mock;
pub mod parsing;
pub mod types;

pub use fallback::RuleBasedCollaborator;
pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use types::*;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Deadline for categorization calls.
pub const CATEGORIZE_TIMEOUT: Duration = Duration::from_secs(10);
/// Deadline for insight generation calls.
pub const INSIGHTS_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for health scoring calls.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait defining the interface for all collaborator backends
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Suggest a category label for an expense name/amount
    async fn categorize(&self, name: &str, amount: f64) -> Result<String>;

    /// Generate free-text spending insights from a summary
    async fn generate_insights(&self, summary: &ExpenseSummary) -> Result<Vec<SpendingInsight>>;

    /// Produce a health assessment from current-month metrics
    async fn score_health(&self, metrics: &HealthMetrics) -> Result<HealthAssessment>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name (for logging)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete collaborator client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AiClient {
    /// Gemini-compatible HTTP backend
    Gemini(GeminiBackend),
    /// Deterministic rule-based strategy
    Rules(RuleBasedCollaborator),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AiClient {
    /// Create a collaborator client from environment variables.
    ///
    /// Checks `AI_BACKEND` to determine which backend to use; returns None
    /// when the selected backend is not configured.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(AiClient::Gemini),
            "rules" => Some(AiClient::Rules(RuleBasedCollaborator::new())),
            "mock" => Some(AiClient::Mock(MockBackend::new())),
            _ => {
                warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(AiClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing.
    pub fn mock() -> Self {
        AiClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl Collaborator for AiClient {
    async fn categorize(&self, name: &str, amount: f64) -> Result<String> {
        match self {
            AiClient::Gemini(b) => b.categorize(name, amount).await,
            AiClient::Rules(b) => b.categorize(name, amount).await,
            AiClient::Mock(b) => b.categorize(name, amount).await,
        }
    }

    async fn generate_insights(&self, summary: &ExpenseSummary) -> Result<Vec<SpendingInsight>> {
        match self {
            AiClient::Gemini(b) => b.generate_insights(summary).await,
            AiClient::Rules(b) => b.generate_insights(summary).await,
            AiClient::Mock(b) => b.generate_insights(summary).await,
        }
    }

    async fn score_health(&self, metrics: &HealthMetrics) -> Result<HealthAssessment> {
        match self {
            AiClient::Gemini(b) => b.score_health(metrics).await,
            AiClient::Rules(b) => b.score_health(metrics).await,
            AiClient::Mock(b) => b.score_health(metrics).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AiClient::Gemini(b) => b.health_check().await,
            AiClient::Rules(b) => b.health_check().await,
            AiClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AiClient::Gemini(b) => b.model(),
            AiClient::Rules(b) => b.model(),
            AiClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AiClient::Gemini(b) => b.host(),
            AiClient::Rules(b) => b.host(),
            AiClient::Mock(b) => b.host(),
        }
    }
}

/// Result of a single deadline-bounded collaborator call
#[derive(Debug)]
pub enum Outcome<T> {
    /// Structured data decoded from the collaborator response
    Data(T),
    /// Collaborator replied but the payload could not be decoded
    Malformed(String),
    /// Collaborator timed out or could not be reached
    Unavailable(String),
}

/// Run a collaborator call under a deadline, classifying the failure modes.
pub async fn call_with_deadline<T, F>(deadline: Duration, fut: F) -> Outcome<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(value)) => Outcome::Data(value),
        Ok(Err(Error::InvalidData(msg))) => Outcome::Malformed(msg),
        Ok(Err(e)) => Outcome::Unavailable(e.to_string()),
        Err(_) => Outcome::Unavailable(format!("deadline of {:?} exceeded", deadline)),
    }
}

/// Why a response came from the rule-based path instead of the collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No collaborator backend is configured
    NotConfigured,
    /// The collaborator timed out or was unreachable
    Unavailable,
    /// The collaborator replied with unparseable output
    Malformed,
}

/// Where a collaborator-shaped response actually came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// The configured collaborator produced this result
    Collaborator,
    /// The rule-based strategy produced this result
    Fallback(FallbackReason),
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Collaborator => "collaborator",
            Provenance::Fallback(_) => "fallback",
        }
    }
}

/// Collaborator facade with built-in degradation
///
/// Wraps an optional [`AiClient`] and the always-available rule-based
/// strategy. Every method returns a result plus its [`Provenance`], so
/// callers can tell a real collaborator answer from a degraded one - and,
/// through the [`FallbackReason`], a timeout from a legitimately empty
/// response.
pub struct AiService {
    client: Option<AiClient>,
    rules: RuleBasedCollaborator,
}

impl AiService {
    pub fn new(client: Option<AiClient>) -> Self {
        Self {
            client,
            rules: RuleBasedCollaborator::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AiClient::from_env())
    }

    /// Whether a collaborator backend is configured at all.
    pub fn configured(&self) -> bool {
        self.client.is_some()
    }

    /// Reachability of the configured collaborator (false when none).
    pub async fn available(&self) -> bool {
        match &self.client {
            Some(client) => client.health_check().await,
            None => false,
        }
    }

    /// Model/host label for logs.
    pub fn describe(&self) -> String {
        match &self.client {
            Some(client) => format!("{} @ {}", client.model(), client.host()),
            None => "not configured".to_string(),
        }
    }

    pub async fn categorize(&self, name: &str, amount: f64) -> (String, Provenance) {
        let reason = match &self.client {
            Some(client) => {
                match call_with_deadline(CATEGORIZE_TIMEOUT, client.categorize(name, amount)).await
                {
                    Outcome::Data(category) => return (category, Provenance::Collaborator),
                    Outcome::Malformed(msg) => {
                        warn!(error = %msg, "Collaborator categorization unparseable");
                        FallbackReason::Malformed
                    }
                    Outcome::Unavailable(msg) => {
                        warn!(error = %msg, "Collaborator unavailable for categorization");
                        FallbackReason::Unavailable
                    }
                }
            }
            None => FallbackReason::NotConfigured,
        };

        (
            RuleBasedCollaborator::categorize_by_keywords(name),
            Provenance::Fallback(reason),
        )
    }

    pub async fn insights(&self, summary: &ExpenseSummary) -> (Vec<SpendingInsight>, Provenance) {
        let reason = match &self.client {
            Some(client) => {
                match call_with_deadline(INSIGHTS_TIMEOUT, client.generate_insights(summary)).await
                {
                    Outcome::Data(insights) => return (insights, Provenance::Collaborator),
                    Outcome::Malformed(msg) => {
                        warn!(error = %msg, "Collaborator insights unparseable");
                        FallbackReason::Malformed
                    }
                    Outcome::Unavailable(msg) => {
                        warn!(error = %msg, "Collaborator unavailable for insights");
                        FallbackReason::Unavailable
                    }
                }
            }
            None => FallbackReason::NotConfigured,
        };

        let insights = self
            .rules
            .generate_insights(summary)
            .await
            .unwrap_or_default();
        (insights, Provenance::Fallback(reason))
    }

    pub async fn health_assessment(
        &self,
        metrics: &HealthMetrics,
    ) -> (HealthAssessment, Provenance) {
        let reason = match &self.client {
            Some(client) => {
                match call_with_deadline(HEALTH_TIMEOUT, client.score_health(metrics)).await {
                    Outcome::Data(assessment) => return (assessment, Provenance::Collaborator),
                    Outcome::Malformed(msg) => {
                        warn!(error = %msg, "Collaborator health assessment unparseable");
                        FallbackReason::Malformed
                    }
                    Outcome::Unavailable(msg) => {
                        warn!(error = %msg, "Collaborator unavailable for health scoring");
                        FallbackReason::Unavailable
                    }
                }
            }
            None => FallbackReason::NotConfigured,
        };

        let assessment = match self.rules.score_health(metrics).await {
            Ok(assessment) => assessment,
            Err(e) => {
                // Rules are infallible today; guard anyway
                warn!(error = %e, "Rule-based health scoring failed");
                HealthAssessment {
                    score: 50.0,
                    grade: "C".to_string(),
                    factors: vec![],
                    recommendations: vec![],
                }
            }
        };
        (assessment, Provenance::Fallback(reason))
    }
}
