//! End-of-month spend prediction
//!
//! Blends two forecasts:
//! - a velocity projection extrapolating the observed daily average over the
//!   days remaining in the current month, and
//! - the average total of fully recorded historical months.
//!
//! With two or more historical months the blend is weighted 60/40 toward
//! velocity and confidence grows with history; with thin history the velocity
//! projection stands alone at reduced confidence.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Expense, Prediction};

/// Weight of the velocity projection in the blended forecast.
const VELOCITY_WEIGHT: f64 = 0.6;
/// Weight of the historical-month average in the blended forecast.
const HISTORY_WEIGHT: f64 = 0.4;

/// Number of days in the given calendar month, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("month is validated by chrono date construction");
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first of month always exists");

    (next_month_first - first).num_days() as u32
}

/// Forecast total spend for the month containing `now`.
pub fn predict_month(records: &[Expense], now: NaiveDate) -> Prediction {
    let current_label = now.format("%Y-%m").to_string();

    let current_spent: f64 = records
        .iter()
        .filter(|e| e.month_label() == current_label)
        .map(|e| e.amount)
        .sum();
    let has_current_records = records.iter().any(|e| e.month_label() == current_label);

    let days_elapsed = now.day();
    let days_remaining = days_in_month(now.year(), now.month()).saturating_sub(days_elapsed);

    if !has_current_records {
        return Prediction {
            predicted_total: 0.0,
            confidence: 0.0,
            message: "No expenses recorded this month yet; add some to get a forecast."
                .to_string(),
            current_spent: 0.0,
            daily_average: 0.0,
            days_elapsed,
            days_remaining,
            historical_monthly_average: 0.0,
            historical_month_count: 0,
        };
    }

    let daily_average = if days_elapsed == 0 {
        0.0
    } else {
        current_spent / days_elapsed as f64
    };
    let velocity_prediction = current_spent + daily_average * days_remaining as f64;

    // Totals of every fully recorded month other than the current one
    let mut historical: BTreeMap<String, f64> = BTreeMap::new();
    for expense in records {
        let label = expense.month_label();
        if label != current_label {
            *historical.entry(label).or_insert(0.0) += expense.amount;
        }
    }
    let historical_month_count = historical.len();
    let historical_monthly_average = if historical.is_empty() {
        velocity_prediction
    } else {
        historical.values().sum::<f64>() / historical_month_count as f64
    };

    let (predicted_total, confidence, message) = if historical_month_count >= 2 {
        let blended =
            VELOCITY_WEIGHT * velocity_prediction + HISTORY_WEIGHT * historical_monthly_average;
        let confidence = (40.0 + 5.0 * historical_month_count as f64).min(85.0);
        (
            blended,
            confidence,
            format!(
                "Blended forecast from current velocity and {} months of history.",
                historical_month_count
            ),
        )
    } else {
        let confidence = (20.0 + 2.0 * days_elapsed as f64).min(60.0);
        (
            velocity_prediction,
            confidence,
            format!(
                "Velocity projection from {} days of activity this month.",
                days_elapsed
            ),
        )
    };

    Prediction {
        predicted_total,
        confidence,
        message,
        current_spent,
        daily_average,
        days_elapsed,
        days_remaining,
        historical_monthly_average,
        historical_month_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense(amount: f64, date: &str) -> Expense {
        Expense {
            id: date.to_string(),
            name: "test".to_string(),
            amount,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category: "Food".to_string(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29); // leap year
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_no_current_month_records() {
        let records = vec![expense(100.0, "2025-01-05")];
        let now = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let prediction = predict_month(&records, now);
        assert_eq!(prediction.predicted_total, 0.0);
        assert_eq!(prediction.confidence, 0.0);
        assert!(!prediction.message.is_empty());
    }

    #[test]
    fn test_velocity_only_with_thin_history() {
        // 150 spent in 10 days of June (30 days): velocity = 150 + 15 * 20
        let records = vec![expense(100.0, "2025-06-03"), expense(50.0, "2025-06-09")];
        let now = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let prediction = predict_month(&records, now);
        assert!((prediction.predicted_total - 450.0).abs() < 1e-6);
        assert!((prediction.daily_average - 15.0).abs() < 1e-6);
        assert_eq!(prediction.days_remaining, 20);
        assert_eq!(prediction.historical_month_count, 0);
        // min(60, 20 + 2*10)
        assert!((prediction.confidence - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_blended_with_history() {
        let records = vec![
            expense(300.0, "2025-04-10"),
            expense(500.0, "2025-05-15"),
            expense(150.0, "2025-06-05"),
        ];
        let now = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let prediction = predict_month(&records, now);
        // velocity: 150 + 15 * 20 = 450; history avg: (300 + 500) / 2 = 400
        let expected = 0.6 * 450.0 + 0.4 * 400.0;
        assert!((prediction.predicted_total - expected).abs() < 1e-6);
        assert_eq!(prediction.historical_month_count, 2);
        // min(85, 40 + 5*2)
        assert!((prediction.confidence - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_caps() {
        // 12 historical months: 40 + 60 caps at 85
        let mut records: Vec<Expense> = (1..=12)
            .map(|m| expense(100.0, &format!("2024-{:02}-15", m)))
            .collect();
        records.push(expense(50.0, "2025-06-10"));
        let now = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();

        let prediction = predict_month(&records, now);
        assert!((prediction.confidence - 85.0).abs() < 1e-6);

        // Velocity-only late in the month: 20 + 2*28 caps at 60
        let records = vec![expense(50.0, "2025-06-10")];
        let now = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let prediction = predict_month(&records, now);
        assert!((prediction.confidence - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_historical_month_stays_velocity() {
        let records = vec![expense(900.0, "2025-05-15"), expense(150.0, "2025-06-05")];
        let now = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let prediction = predict_month(&records, now);
        // One historical month is not enough for the blend
        assert!((prediction.predicted_total - 450.0).abs() < 1e-6);
        assert_eq!(prediction.historical_month_count, 1);
        assert!((prediction.historical_monthly_average - 900.0).abs() < 1e-6);
    }
}
