//! Application State
//!
//! In-memory mirror of the backend's expenses and budgets plus the
//! navigation state of the dashboard.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::api::{Budget, Expense};

/// Dashboard sections. Any section is reachable from any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Dashboard,
    Expenses,
    Budgets,
    Ai,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Expenses,
        Section::Budgets,
        Section::Ai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Expenses => "expenses",
            Section::Budgets => "budgets",
            Section::Ai => "ai",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" | "home" => Ok(Section::Dashboard),
            "expenses" => Ok(Section::Expenses),
            "budgets" => Ok(Section::Budgets),
            "ai" | "insights" => Ok(Section::Ai),
            other => Err(format!("unknown section: {}", other)),
        }
    }
}

/// State owned by the controller for the lifetime of a session
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Currently active section
    pub current_section: Section,
    /// Cached expenses in arrival order
    pub expenses: Vec<Expense>,
    /// Cached budgets in arrival order
    pub budgets: Vec<Budget>,
    /// Whether a handler is waiting on the backend
    pub is_loading: bool,
}

impl AppState {
    /// Sum of cached expense amounts with exactly this category
    pub fn spent_for_category(&self, category: &str) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.category == category)
            .fold(0.0, |total, e| total + e.amount)
    }

    /// Drop the cached expense with `id`. Returns whether one was removed.
    pub fn remove_expense(&mut self, id: i64) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }
}

/// Category -> total spent over `expenses`
pub fn spending_by_category(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}

/// Monthly totals keyed by (year, month), skipping undated expenses
pub fn monthly_totals(expenses: &[Expense]) -> BTreeMap<(i32, u32), f64> {
    use chrono::Datelike;

    let mut totals = BTreeMap::new();
    for expense in expenses {
        if let Some(date) = parse_expense_date(&expense.date) {
            *totals.entry((date.year(), date.month())).or_insert(0.0) += expense.amount;
        }
    }
    totals
}

/// Parse the timestamp formats the backend emits
///
/// Accepts RFC 3339 (`2024-01-05T09:30:00+00:00`), naive ISO-8601 with or
/// without fractional seconds (`2024-01-05T09:30:00.123456`), and bare dates.
pub fn parse_expense_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
