//! Form input and local validation
//!
//! Validation runs before any network call; a rejected form never reaches
//! the transport.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::api::{BudgetPeriod, NewBudget, NewExpense};

/// Categories the front ends offer; the backend accepts any string
pub const CATEGORIES: [&str; 7] = [
    "food",
    "transport",
    "entertainment",
    "shopping",
    "utilities",
    "healthcare",
    "other",
];

/// Local validation failures, shown to the user verbatim
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid amount")]
    Amount,

    #[error("Please select a category")]
    Category,

    #[error("Please select a budget period")]
    Period,

    #[error("Please enter a question")]
    Question,
}

/// Raw fields of the expense form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseForm {
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl ExpenseForm {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Validate and stamp the expense with `now`
    pub fn validate(&self, now: DateTime<Utc>) -> Result<NewExpense, ValidationError> {
        let amount = parse_amount(&self.amount)?;
        let category = required_category(&self.category)?;

        Ok(NewExpense {
            amount,
            category,
            description: self.description.trim().to_string(),
            date: now.to_rfc3339(),
        })
    }
}

/// Raw fields of the budget form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetForm {
    pub category: String,
    pub amount: String,
    /// Empty means monthly
    pub period: String,
}

impl BudgetForm {
    pub fn new(
        category: impl Into<String>,
        amount: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
            period: period.into(),
        }
    }

    pub fn validate(&self) -> Result<NewBudget, ValidationError> {
        let category = required_category(&self.category)?;
        let amount = parse_amount(&self.amount)?;
        let period = if self.period.trim().is_empty() {
            BudgetPeriod::default()
        } else {
            self.period
                .parse::<BudgetPeriod>()
                .map_err(|_| ValidationError::Period)?
        };

        Ok(NewBudget {
            category,
            amount,
            period,
        })
    }
}

/// Trimmed, non-empty AI question
pub fn validate_question(question: &str) -> Result<&str, ValidationError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ValidationError::Question);
    }
    Ok(question)
}

fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let amount: f64 = raw
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| ValidationError::Amount)?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::Amount);
    }
    Ok(amount)
}

fn required_category(raw: &str) -> Result<String, ValidationError> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(ValidationError::Category);
    }
    Ok(category.to_string())
}
