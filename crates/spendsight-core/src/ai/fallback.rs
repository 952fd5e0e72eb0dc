//! Rule-based collaborator
//!
//! Deterministic stand-in for the generative backend: keyword-match
//! categorization and templated low-confidence insights. This is a
//! first-class strategy, not just an error path - it can be selected
//! directly via `AI_BACKEND=rules`.

use async_trait::async_trait;

use crate::error::Result;

use super::types::{ExpenseSummary, HealthAssessment, HealthMetrics, SpendingInsight};
use super::Collaborator;

/// Keyword -> category table, checked top to bottom against the uppercased
/// expense name. First hit wins; no hit means "Other".
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("Groceries", &["GROCER", "SUPERMARKET", "MART", "BAZAAR"]),
    (
        "Food",
        &[
            "COFFEE", "CAFE", "RESTAURANT", "LUNCH", "DINNER", "BREAKFAST", "PIZZA", "BURGER",
            "SNACK", "TEA",
        ],
    ),
    (
        "Transportation",
        &["BUS", "METRO", "TRAIN", "TAXI", "UBER", "OLA", "FUEL", "PETROL", "PARKING"],
    ),
    (
        "Bills",
        &["ELECTRICITY", "WATER BILL", "INTERNET", "BROADBAND", "PHONE", "RECHARGE", "BILL"],
    ),
    (
        "Entertainment",
        &["MOVIE", "CINEMA", "NETFLIX", "SPOTIFY", "PRIME", "GAME", "CONCERT"],
    ),
    ("Housing", &["RENT", "LEASE", "APARTMENT", "MAINTENANCE"]),
    (
        "Health",
        &["PHARMACY", "MEDICINE", "DOCTOR", "HOSPITAL", "CLINIC", "GYM"],
    ),
    ("Education", &["COURSE", "TUITION", "BOOK", "EXAM", "SCHOOL"]),
    ("Personal Care", &["SALON", "HAIRCUT", "SPA", "COSMETIC"]),
    ("Savings", &["SIP", "DEPOSIT", "INVESTMENT", "MUTUAL FUND"]),
    ("Travel", &["FLIGHT", "HOTEL", "TRIP", "AIRLINE", "VISA"]),
];

/// Confidence attached to canned, rule-derived insights.
const RULE_INSIGHT_CONFIDENCE: f64 = 0.3;

/// Deterministic rule-based collaborator
#[derive(Clone, Default)]
pub struct RuleBasedCollaborator;

impl RuleBasedCollaborator {
    pub fn new() -> Self {
        Self
    }

    /// Keyword categorization, exposed for synchronous callers and tests.
    pub fn categorize_by_keywords(name: &str) -> String {
        let upper = name.to_uppercase();
        for (category, keywords) in CATEGORY_RULES {
            if keywords.iter().any(|k| upper.contains(k)) {
                return category.to_string();
            }
        }
        "Other".to_string()
    }
}

#[async_trait]
impl Collaborator for RuleBasedCollaborator {
    async fn categorize(&self, name: &str, _amount: f64) -> Result<String> {
        Ok(Self::categorize_by_keywords(name))
    }

    async fn generate_insights(&self, summary: &ExpenseSummary) -> Result<Vec<SpendingInsight>> {
        if summary.expense_count == 0 {
            return Ok(vec![]);
        }

        let mut insights = Vec::new();

        if let Some((category, amount)) = summary
            .category_breakdown
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        {
            let share = if summary.total_expenses > 0.0 {
                amount / summary.total_expenses * 100.0
            } else {
                0.0
            };
            insights.push(SpendingInsight {
                message: format!(
                    "{} is your largest category at {:.1}% of total spend.",
                    category, share
                ),
                confidence: RULE_INSIGHT_CONFIDENCE,
                data: serde_json::json!({ "category": category, "amount": amount }),
            });
        }

        if summary.monthly_expenses.len() > 1 {
            let average =
                summary.total_expenses / summary.monthly_expenses.len() as f64;
            insights.push(SpendingInsight {
                message: format!(
                    "You average {:.2} per recorded month across {} months.",
                    average,
                    summary.monthly_expenses.len()
                ),
                confidence: RULE_INSIGHT_CONFIDENCE,
                data: serde_json::json!({ "monthly_average": average }),
            });
        }

        insights.push(SpendingInsight {
            message: format!(
                "Recorded {} expenses totalling {:.2}.",
                summary.expense_count, summary.total_expenses
            ),
            confidence: RULE_INSIGHT_CONFIDENCE,
            data: serde_json::Value::Null,
        });

        Ok(insights)
    }

    async fn score_health(&self, metrics: &HealthMetrics) -> Result<HealthAssessment> {
        // Band on budget utilization, mirroring the deterministic scorer's
        // shape so callers see comparable figures from either path.
        let (score, grade) = if metrics.total_budget <= 0.0 {
            (50.0, "C")
        } else if metrics.budget_utilization < 50.0 {
            (90.0, "A")
        } else if metrics.budget_utilization < 70.0 {
            (75.0, "B")
        } else if metrics.budget_utilization < 90.0 {
            (60.0, "C")
        } else {
            (30.0, "D")
        };

        let factors = if metrics.total_budget > 0.0 {
            vec![format!(
                "Used {:.1}% of your combined monthly budget.",
                metrics.budget_utilization
            )]
        } else {
            vec!["No budgets configured; utilization unknown.".to_string()]
        };

        Ok(HealthAssessment {
            score,
            grade: grade.to_string(),
            factors,
            recommendations: vec![
                "Set category budgets to sharpen this assessment.".to_string(),
            ],
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        "rules"
    }

    fn host(&self) -> &str {
        "local://rules"
    }
}
