//! Financial health scoring
//!
//! Derives a 0-100 health score from the spend-to-income ratio. The score
//! bands are a hard contract; the insight and recommendation strings are
//! human-readable templates over the same figures and may be reworded freely.

use crate::models::{HealthReport, Salary};

/// Score assigned when no income is configured and no ratio can be formed.
pub const NO_INCOME_SCORE: f64 = 50.0;

/// Score bands over the spending ratio, checked in order.
const SCORE_BANDS: [(f64, f64); 3] = [(50.0, 90.0), (70.0, 75.0), (90.0, 60.0)];
/// Score when the ratio is past the last band.
const OVERSPEND_SCORE: f64 = 30.0;

/// Heuristic scorer over one month's total spend and the configured salary
pub struct HealthScorer;

impl HealthScorer {
    /// Score the month. `total_spent` is the current-month total.
    pub fn score(total_spent: f64, salary: &Salary) -> HealthReport {
        if salary.monthly <= 0.0 {
            return HealthReport {
                score: NO_INCOME_SCORE,
                grade: grade_for(NO_INCOME_SCORE),
                spending_ratio: 0.0,
                insights: vec![
                    "No monthly income configured, so spending discipline cannot be measured."
                        .to_string(),
                ],
                recommendations: vec![
                    "Set your monthly salary to unlock income-aware health scoring.".to_string(),
                ],
            };
        }

        let spending_ratio = total_spent / salary.monthly * 100.0;
        let score = SCORE_BANDS
            .iter()
            .find(|(limit, _)| spending_ratio < *limit)
            .map(|(_, score)| *score)
            .unwrap_or(OVERSPEND_SCORE);

        let mut insights = vec![format!(
            "You spent {:.1}% of your monthly income this month ({:.2} of {:.2} {}).",
            spending_ratio, total_spent, salary.monthly, salary.currency
        )];
        let mut recommendations = Vec::new();

        match score {
            s if s >= 90.0 => {
                insights.push("Spending is comfortably below half your income.".to_string());
                recommendations
                    .push("Consider moving the surplus into savings or investments.".to_string());
            }
            s if s >= 75.0 => {
                recommendations.push(
                    "Healthy margin overall; watch discretionary categories to keep it."
                        .to_string(),
                );
            }
            s if s >= 60.0 => {
                insights.push("Spending is approaching your income.".to_string());
                recommendations.push(
                    "Review your largest categories and trim recurring costs.".to_string(),
                );
            }
            _ => {
                insights.push("Spending is at or above your income.".to_string());
                recommendations.push(
                    "Cut non-essential spending this month to avoid eating into reserves."
                        .to_string(),
                );
            }
        }

        HealthReport {
            score,
            grade: grade_for(score),
            spending_ratio,
            insights,
            recommendations,
        }
    }
}

/// Letter grade for a score. Template mapping, not part of the band contract.
fn grade_for(score: f64) -> String {
    match score {
        s if s >= 85.0 => "A",
        s if s >= 70.0 => "B",
        s if s >= 50.0 => "C",
        _ => "D",
    }
    .to_string()
}
