//! Mock collaborator for testing
//!
//! Returns predictable responses for all collaborator operations. The
//! unhealthy variant fails every call, which lets tests exercise the
//! degradation path without a network.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::fallback::RuleBasedCollaborator;
use super::types::{ExpenseSummary, HealthAssessment, HealthMetrics, SpendingInsight};
use super::Collaborator;

/// Mock collaborator backend
#[derive(Clone)]
pub struct MockBackend {
    /// Whether calls succeed and health_check returns true
    pub healthy: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a healthy mock backend.
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create a mock backend that fails every call.
    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }

    fn ensure_healthy(&self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(Error::InvalidData("mock backend is unhealthy".into()))
        }
    }
}

#[async_trait]
impl Collaborator for MockBackend {
    async fn categorize(&self, name: &str, _amount: f64) -> Result<String> {
        self.ensure_healthy()?;
        Ok(RuleBasedCollaborator::categorize_by_keywords(name))
    }

    async fn generate_insights(&self, summary: &ExpenseSummary) -> Result<Vec<SpendingInsight>> {
        self.ensure_healthy()?;
        Ok(vec![SpendingInsight {
            message: format!(
                "Mock insight over {} expenses totalling {:.2}.",
                summary.expense_count, summary.total_expenses
            ),
            confidence: 0.9,
            data: serde_json::json!({ "total": summary.total_expenses }),
        }])
    }

    async fn score_health(&self, _metrics: &HealthMetrics) -> Result<HealthAssessment> {
        self.ensure_healthy()?;
        Ok(HealthAssessment {
            score: 72.0,
            grade: "B".to_string(),
            factors: vec!["Mock factor".to_string()],
            recommendations: vec!["Mock recommendation".to_string()],
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
