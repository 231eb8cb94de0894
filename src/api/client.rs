//! Budget Buddy REST API Client
//!
//! HTTP client for communicating with the Budget Buddy backend.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{
    Budget, BudgetEnvelope, BudgetListResponse, DeleteAck, Expense, ExpenseEnvelope,
    ExpenseListResponse, HealthStatus, InsightRequest, InsightResponse, MonthlyReport,
    NewBudget, NewExpense, ResetSummary, SampleQuestionsResponse,
};
use super::error::{ApiError, ApiResult};
use super::BudgetApi;
use crate::config::ApiConfig;

/// reqwest-backed [`BudgetApi`] implementation
///
/// Holds nothing but the pooled HTTP client and the base address; every call
/// is a fresh round-trip with no retries and no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Create a client from the `[api]` config section
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let result = execute(request).await;

        if let Err(e) = &result {
            tracing::error!(endpoint = %endpoint, error = %e, "API request failed");
        }

        result
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
        });
    }

    Ok(response.json::<T>().await?)
}

#[async_trait]
impl BudgetApi for ApiClient {
    async fn get_expenses(&self) -> ApiResult<Vec<Expense>> {
        let endpoint = "/api/expenses";
        let response: ExpenseListResponse = self
            .send(endpoint, self.request(Method::GET, endpoint))
            .await?;
        Ok(response.expenses)
    }

    async fn create_expense(&self, expense: &NewExpense) -> ApiResult<Expense> {
        let endpoint = "/api/expenses";
        let response: ExpenseEnvelope = self
            .send(endpoint, self.request(Method::POST, endpoint).json(expense))
            .await?;
        Ok(response.expense)
    }

    async fn delete_expense(&self, id: i64) -> ApiResult<DeleteAck> {
        let endpoint = format!("/api/expenses/{}", id);
        self.send(&endpoint, self.request(Method::DELETE, &endpoint))
            .await
    }

    async fn get_budgets(&self) -> ApiResult<Vec<Budget>> {
        let endpoint = "/api/budgets";
        let response: BudgetListResponse = self
            .send(endpoint, self.request(Method::GET, endpoint))
            .await?;
        Ok(response.budgets)
    }

    async fn create_budget(&self, budget: &NewBudget) -> ApiResult<Budget> {
        let endpoint = "/api/budgets";
        let response: BudgetEnvelope = self
            .send(endpoint, self.request(Method::POST, endpoint).json(budget))
            .await?;
        Ok(response.budget)
    }

    async fn get_ai_insights(
        &self,
        expenses: &[Expense],
        question: &str,
    ) -> ApiResult<InsightResponse> {
        let endpoint = "/api/ai/insights";
        let body = InsightRequest { expenses, question };
        self.send(endpoint, self.request(Method::POST, endpoint).json(&body))
            .await
    }

    async fn get_monthly_report(&self) -> ApiResult<MonthlyReport> {
        let endpoint = "/api/reports/monthly";
        self.send(endpoint, self.request(Method::GET, endpoint))
            .await
    }

    async fn health_check(&self) -> ApiResult<HealthStatus> {
        let endpoint = "/health";
        self.send(endpoint, self.request(Method::GET, endpoint))
            .await
    }

    async fn get_sample_questions(&self) -> ApiResult<Vec<String>> {
        let endpoint = "/api/sample-questions";
        let response: SampleQuestionsResponse = self
            .send(endpoint, self.request(Method::GET, endpoint))
            .await?;
        Ok(response.questions)
    }

    async fn reset_test_data(&self) -> ApiResult<ResetSummary> {
        let endpoint = "/api/reset-data";
        self.send(endpoint, self.request(Method::POST, endpoint))
            .await
    }
}
