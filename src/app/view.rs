//! View models
//!
//! Pure state -> view transforms plus the [`View`] trait a UI layer
//! implements to display them. Nothing here touches the network.

use crate::api::{Budget, Expense, InsightResponse, MonthlyReport};

use super::notice::Notice;
use super::state::{parse_expense_date, Section};

pub const NO_EXPENSES: &str = "No expenses yet. Add your first expense!";
pub const NO_BUDGETS: &str = "No budgets yet. Create your first budget!";
pub const NO_SPENDING_DATA: &str = "No spending data available";
pub const AI_LOADING: &str = "Getting AI insights...";

/// Which form a view should reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Expense,
    Budget,
    Question,
}

/// Rendering adapter for the dashboard
pub trait View {
    /// Mark `section` as the visible one
    fn show_section(&mut self, section: Section);

    fn render_dashboard(&mut self, dashboard: &DashboardView);

    fn render_expenses(&mut self, expenses: &ExpensesView);

    fn render_budgets(&mut self, budgets: &BudgetsView);

    fn render_ai(&mut self, panel: &AiPanel);

    fn render_sample_questions(&mut self, questions: &[String]);

    /// Put `question` in the AI question field
    fn fill_question(&mut self, question: &str);

    fn reset_form(&mut self, form: FormKind);

    fn show_notice(&mut self, notice: &Notice);

    /// Ask the user to confirm a destructive action
    fn confirm(&mut self, prompt: &str) -> bool;

    fn set_loading(&mut self, _loading: bool) {}
}

// ============================================
// Dashboard
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_spent: String,
    pub expense_count: u64,
    pub budget_count: usize,
    /// Whether the spending chart has anything to show
    pub has_spending_data: bool,
}

impl DashboardView {
    pub fn new(report: &MonthlyReport, budget_count: usize) -> Self {
        Self {
            total_spent: format_money(report.total_spent),
            expense_count: report.expense_count,
            budget_count,
            has_spending_data: !report.category_breakdown.is_empty(),
        }
    }
}

// ============================================
// Expenses
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: i64,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: String,
}

impl From<&Expense> for ExpenseRow {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            amount: format_money(expense.amount),
            category: format_category(&expense.category),
            description: expense.description.clone(),
            date: format_date(&expense.date),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpensesView {
    Empty(&'static str),
    Rows(Vec<ExpenseRow>),
}

impl ExpensesView {
    pub fn new(expenses: &[Expense]) -> Self {
        if expenses.is_empty() {
            return ExpensesView::Empty(NO_EXPENSES);
        }
        ExpensesView::Rows(expenses.iter().map(ExpenseRow::from).collect())
    }
}

// ============================================
// Budgets
// ============================================

/// Progress of one budget against cached spending
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub category: String,
    /// e.g. `$400.00 monthly`
    pub amount: String,
    pub spent: f64,
    /// Raw percentage, may exceed 100
    pub percentage: f64,
    /// Progress-bar fill, clamped to 0..=100
    pub fill: f64,
    pub over_budget: bool,
}

impl BudgetProgress {
    pub fn new(budget: &Budget, spent: f64) -> Self {
        let percentage = if budget.amount > 0.0 {
            spent / budget.amount * 100.0
        } else {
            0.0
        };

        Self {
            category: format_category(&budget.category),
            amount: format!("{} {}", format_money(budget.amount), budget.period),
            spent,
            percentage,
            fill: percentage.clamp(0.0, 100.0),
            over_budget: percentage > 100.0,
        }
    }

    /// e.g. `Spent: $500.00 (125.0%)`
    pub fn caption(&self) -> String {
        format!("Spent: {} ({:.1}%)", format_money(self.spent), self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BudgetsView {
    Empty(&'static str),
    Rows(Vec<BudgetProgress>),
}

impl BudgetsView {
    /// `spent_for` maps a category to what has been spent in it
    pub fn new(budgets: &[Budget], spent_for: impl Fn(&str) -> f64) -> Self {
        if budgets.is_empty() {
            return BudgetsView::Empty(NO_BUDGETS);
        }
        BudgetsView::Rows(
            budgets
                .iter()
                .map(|b| BudgetProgress::new(b, spent_for(&b.category)))
                .collect(),
        )
    }
}

// ============================================
// AI
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct InsightView {
    pub insight: String,
    pub recommendations: Vec<String>,
    /// One-line spending summary when the backend sent one
    pub summary: Option<String>,
}

impl From<&InsightResponse> for InsightView {
    fn from(response: &InsightResponse) -> Self {
        Self {
            insight: response.insight.clone(),
            recommendations: response.recommendations.clone(),
            summary: response.summary.as_ref().map(|s| {
                format!(
                    "{} across {} expenses, mostly {}",
                    format_money(s.total_spent),
                    s.expense_count,
                    format_category(&s.top_category)
                )
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AiPanel {
    #[default]
    Idle,
    Loading(&'static str),
    Insight(InsightView),
}

// ============================================
// Formatting
// ============================================

/// `$1234.50`
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// `eating_out` -> `Eating out`
pub fn format_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars
                .map(|c| if c == '_' || c == '-' { ' ' } else { c })
                .collect();
            format!("{}{}", first.to_uppercase(), rest)
        }
        None => String::new(),
    }
}

/// `2024-01-05T09:30:00` -> `Jan 5, 2024`; unparseable input is kept as is
pub fn format_date(raw: &str) -> String {
    match parse_expense_date(raw) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}
