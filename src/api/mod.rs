//! Budget Buddy Transport
//!
//! Typed calls against the backend's REST surface.
//!
//! # Endpoints
//!
//! ## Expenses
//! - `GET /api/expenses` - List expenses
//! - `POST /api/expenses` - Create an expense
//! - `DELETE /api/expenses/{id}` - Delete an expense
//!
//! ## Budgets
//! - `GET /api/budgets` - List budgets
//! - `POST /api/budgets` - Create a budget
//!
//! ## AI / Reports
//! - `POST /api/ai/insights` - Ask a budgeting question
//! - `GET /api/reports/monthly` - Monthly spending report
//! - `GET /api/sample-questions` - Suggested questions
//!
//! ## Utility
//! - `GET /health` - Backend health
//! - `POST /api/reset-data` - Restore the demo data set
//!
//! Any non-2xx response is a failure carrying the numeric status.

mod client;
pub mod dto;
pub mod error;

pub use client::ApiClient;
pub use dto::{
    Budget, BudgetPeriod, DeleteAck, Expense, HealthStatus, InsightResponse, InsightSummary,
    MonthlyReport, NewBudget, NewExpense, ResetSummary,
};
pub use error::{ApiError, ApiResult};

use async_trait::async_trait;

/// One method per backend operation
///
/// The controller depends on this trait rather than on [`ApiClient`], so the
/// transport can be swapped for an in-memory fake.
#[async_trait]
pub trait BudgetApi: Send + Sync {
    async fn get_expenses(&self) -> ApiResult<Vec<Expense>>;

    async fn create_expense(&self, expense: &NewExpense) -> ApiResult<Expense>;

    async fn delete_expense(&self, id: i64) -> ApiResult<DeleteAck>;

    async fn get_budgets(&self) -> ApiResult<Vec<Budget>>;

    async fn create_budget(&self, budget: &NewBudget) -> ApiResult<Budget>;

    async fn get_ai_insights(
        &self,
        expenses: &[Expense],
        question: &str,
    ) -> ApiResult<InsightResponse>;

    async fn get_monthly_report(&self) -> ApiResult<MonthlyReport>;

    async fn health_check(&self) -> ApiResult<HealthStatus>;

    async fn get_sample_questions(&self) -> ApiResult<Vec<String>>;

    async fn reset_test_data(&self) -> ApiResult<ResetSummary>;
}
