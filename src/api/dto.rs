//! Data Transfer Objects
//!
//! Request and response types for the Budget Buddy REST surface.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================
// EXPENSE DTOs
// ============================================

/// An expense as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Server-assigned identifier
    pub id: i64,
    /// Amount spent, always positive
    pub amount: f64,
    /// Category key (e.g. "food", "transport")
    pub category: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// ISO-8601 timestamp
    #[serde(default)]
    pub date: String,
}

/// Create expense request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpenseListResponse {
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpenseEnvelope {
    pub expense: Expense,
}

/// Acknowledgment returned by delete operations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================
// BUDGET DTOs
// ============================================

/// Budget period
///
/// The backend stores any string, so unrecognised periods decode into
/// [`BudgetPeriod::Other`] instead of failing the whole budget list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
    Yearly,
    Other(String),
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &str {
        match self {
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Yearly => "yearly",
            BudgetPeriod::Other(period) => period,
        }
    }
}

impl From<String> for BudgetPeriod {
    fn from(period: String) -> Self {
        period.parse().unwrap_or(BudgetPeriod::Other(period))
    }
}

impl From<BudgetPeriod> for String {
    fn from(period: BudgetPeriod) -> Self {
        match period {
            BudgetPeriod::Other(period) => period,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses only the periods the forms offer
impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(BudgetPeriod::Monthly),
            "weekly" => Ok(BudgetPeriod::Weekly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            other => Err(format!("unknown budget period: {}", other)),
        }
    }
}

/// A category budget as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Server-assigned identifier (older backends omit it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

/// Create budget request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBudget {
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BudgetListResponse {
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BudgetEnvelope {
    pub budget: Budget,
}

// ============================================
// AI DTOs
// ============================================

#[derive(Debug, Serialize)]
pub(crate) struct InsightRequest<'a> {
    pub expenses: &'a [Expense],
    pub question: &'a str,
}

/// AI insight for a budgeting question
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightResponse {
    pub insight: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub summary: Option<InsightSummary>,
}

/// Spending summary the backend attaches to an insight
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightSummary {
    pub total_spent: f64,
    pub top_category: String,
    pub expense_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SampleQuestionsResponse {
    #[serde(default)]
    pub questions: Vec<String>,
}

// ============================================
// REPORT / UTILITY DTOs
// ============================================

/// Monthly spending report
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyReport {
    pub total_spent: f64,
    pub expense_count: u64,
    /// Category -> total spent
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, f64>,
}

/// Backend health status
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Result of resetting the demo data set
#[derive(Debug, Clone, Deserialize)]
pub struct ResetSummary {
    pub message: String,
    pub expenses_count: u64,
    pub budgets_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_period_parse() {
        assert_eq!("Monthly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Monthly);
        assert_eq!(" weekly ".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert!("fortnightly".parse::<BudgetPeriod>().is_err());
    }

    #[test]
    fn test_budget_without_id_or_period() {
        let budget: Budget =
            serde_json::from_str(r#"{"category": "food", "amount": 400.0}"#).unwrap();
        assert_eq!(budget.id, None);
        assert_eq!(budget.period, BudgetPeriod::Monthly);
    }

    #[test]
    fn test_unknown_period_kept() {
        let json = r#"{"budgets": [
            {"id": 1, "category": "food", "amount": 400.0, "period": "monthly"},
            {"id": 2, "category": "utilities", "amount": 900.0, "period": "quarterly"}
        ]}"#;
        let list: BudgetListResponse = serde_json::from_str(json).unwrap();

        assert_eq!(list.budgets.len(), 2);
        assert_eq!(list.budgets[0].period, BudgetPeriod::Monthly);
        assert_eq!(
            list.budgets[1].period,
            BudgetPeriod::Other("quarterly".to_string())
        );
        assert_eq!(list.budgets[1].period.to_string(), "quarterly");

        let body = serde_json::to_value(&list.budgets[1]).unwrap();
        assert_eq!(body["period"], "quarterly");
    }

    #[test]
    fn test_known_period_serializes_lowercase() {
        let body = serde_json::to_value(NewBudget {
            category: "food".to_string(),
            amount: 100.0,
            period: BudgetPeriod::Weekly,
        })
        .unwrap();
        assert_eq!(body["period"], "weekly");
    }

    #[test]
    fn test_expense_list_missing_field() {
        let list: ExpenseListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.expenses.is_empty());
    }

    #[test]
    fn test_insight_request_shape() {
        let expenses = vec![Expense {
            id: 1,
            amount: 18.5,
            category: "food".to_string(),
            description: "Coffee and pastry".to_string(),
            date: "2024-01-05T09:30:00".to_string(),
        }];
        let body = serde_json::to_value(InsightRequest {
            expenses: &expenses,
            question: "How can I save money?",
        })
        .unwrap();

        assert_eq!(body["question"], "How can I save money?");
        assert_eq!(body["expenses"][0]["category"], "food");
        assert_eq!(body["expenses"][0]["id"], 1);
    }

    #[test]
    fn test_insight_response_with_summary() {
        let json = r#"{
            "insight": "Cook at home more often.",
            "recommendations": ["Try meal planning"],
            "summary": {"total_spent": 412.5, "top_category": "food", "expense_count": 9}
        }"#;
        let response: InsightResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.summary.unwrap().top_category, "food");
    }
}
