//! Application Controller
//!
//! Owns the session state, turns events into transport calls and state
//! mutations, and pushes fresh view models to the [`View`].
//!
//! Every handler follows the same shape: an inner step returning
//! `Result<(), HandlerError>`, then an unconditional [`Controller::finish`]
//! that surfaces the failure (if any) and clears the loading flag.

use chrono::Utc;
use thiserror::Error;

use crate::api::{ApiError, BudgetApi};
use crate::charts::{
    ChartBackend, ChartManager, TrendSeries, BUDGET_CHART, SPENDING_CHART, TREND_CHART,
};

use super::forms::{validate_question, BudgetForm, ExpenseForm, ValidationError};
use super::notice::{Notice, Notices};
use super::state::{monthly_totals, AppState, Section};
use super::view::{
    AiPanel, BudgetsView, DashboardView, ExpensesView, FormKind, InsightView, View, AI_LOADING,
    NO_SPENDING_DATA,
};

const DELETE_PROMPT: &str = "Are you sure you want to delete this expense?";

/// User actions the controller reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Navigate(Section),
    SubmitExpense(ExpenseForm),
    SubmitBudget(BudgetForm),
    AskQuestion(String),
    /// Pre-fill the question field with the n-th sample question
    UseSampleQuestion(usize),
    DeleteExpense(i64),
    ResetDemoData,
}

/// Why a handler gave up
#[derive(Debug, Error)]
enum HandlerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{message}")]
    Backend {
        message: &'static str,
        #[source]
        source: ApiError,
    },
}

fn backend(message: &'static str) -> impl FnOnce(ApiError) -> HandlerError {
    move |source| HandlerError::Backend { message, source }
}

/// The dashboard's state machine
pub struct Controller<A, V, B: ChartBackend> {
    api: A,
    view: V,
    charts: ChartManager<B>,
    state: AppState,
    notices: Notices,
    ai_panel: AiPanel,
    sample_questions: Option<Vec<String>>,
    bound: bool,
    failures: usize,
}

impl<A, V, B> Controller<A, V, B>
where
    A: BudgetApi,
    V: View,
    B: ChartBackend,
{
    pub fn new(api: A, view: V, charts: ChartManager<B>, notices: Notices) -> Self {
        Self {
            api,
            view,
            charts,
            state: AppState::default(),
            notices,
            ai_panel: AiPanel::default(),
            sample_questions: None,
            bound: false,
            failures: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn charts(&self) -> &ChartManager<B> {
        &self.charts
    }

    pub fn ai_panel(&self) -> &AiPanel {
        &self.ai_panel
    }

    /// Whether any load or handler has failed this session
    ///
    /// Unlike [`notice`](Self::notice) this does not expire.
    pub fn has_failed(&self) -> bool {
        self.failures > 0
    }

    /// The visible notice, if it has not been dismissed yet
    pub fn notice(&mut self) -> Option<&Notice> {
        self.notices.current()
    }

    /// Bind events, load expenses and budgets, then open the dashboard
    pub async fn initialize(&mut self) {
        if !self.bound {
            self.bound = true;
            tracing::debug!("Event bindings registered");
        }

        self.load_initial_data().await;
        self.show_section(Section::Dashboard).await;
    }

    /// Route an event to its handler. Events before [`initialize`](Self::initialize) are dropped.
    pub async fn dispatch(&mut self, event: Event) {
        if !self.bound {
            tracing::warn!(?event, "Event received before initialize, ignoring");
            return;
        }

        match event {
            Event::Navigate(section) => self.show_section(section).await,
            Event::SubmitExpense(form) => self.submit_expense(&form).await,
            Event::SubmitBudget(form) => self.submit_budget(&form).await,
            Event::AskQuestion(question) => self.submit_ai_question(&question).await,
            Event::UseSampleQuestion(index) => self.use_sample_question(index),
            Event::DeleteExpense(id) => self.delete_expense(id).await,
            Event::ResetDemoData => self.reset_demo_data().await,
        }
    }

    /// Fetch expenses and budgets together; both must succeed
    ///
    /// Returns whether the cache was refreshed. On failure the cache keeps
    /// whatever it held before.
    pub async fn load_initial_data(&mut self) -> bool {
        self.set_loading(true);

        let result = tokio::try_join!(self.api.get_expenses(), self.api.get_budgets());
        let loaded = match result {
            Ok((expenses, budgets)) => {
                tracing::info!(
                    expenses = expenses.len(),
                    budgets = budgets.len(),
                    "Loaded initial data"
                );
                self.state.expenses = expenses;
                self.state.budgets = budgets;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load initial data");
                self.failures += 1;
                self.notify_error("Failed to load data. Please refresh the page.");
                false
            }
        };

        self.set_loading(false);
        loaded
    }

    /// Enter `section` and load what it shows
    pub async fn show_section(&mut self, section: Section) {
        self.view.show_section(section);
        self.state.current_section = section;

        match section {
            Section::Dashboard => self.update_dashboard().await,
            Section::Expenses => self.load_expenses(),
            Section::Budgets => self.load_budgets(),
            Section::Ai => self.load_ai().await,
        }
    }

    /// Refresh summary cards and charts from the monthly report
    pub async fn update_dashboard(&mut self) {
        let report = match self.api.get_monthly_report().await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Failed to update dashboard");
                return;
            }
        };

        let dashboard = DashboardView::new(&report, self.state.budgets.len());

        if dashboard.has_spending_data {
            self.charts
                .create_spending_chart(SPENDING_CHART, &report.category_breakdown);
        } else {
            self.charts.show_empty(SPENDING_CHART, NO_SPENDING_DATA);
        }

        let trend = TrendSeries::from_monthly_totals(&monthly_totals(&self.state.expenses));
        if trend.is_empty() {
            self.charts.destroy_chart(TREND_CHART);
        } else {
            self.charts.create_trend_chart(TREND_CHART, &trend);
        }

        self.view.render_dashboard(&dashboard);
    }

    /// Render the cached expense list
    pub fn load_expenses(&mut self) {
        let expenses = ExpensesView::new(&self.state.expenses);
        self.view.render_expenses(&expenses);
    }

    /// Render budget progress and the budget vs actual chart from the cache
    pub fn load_budgets(&mut self) {
        if self.state.budgets.is_empty() {
            self.charts.destroy_chart(BUDGET_CHART);
        } else {
            self.charts
                .create_budget_chart(BUDGET_CHART, &self.state.budgets, &self.state.expenses);
        }

        let budgets = self.budgets_view();
        self.view.render_budgets(&budgets);
    }

    /// Budget progress computed locally from cached expenses
    pub fn budgets_view(&self) -> BudgetsView {
        BudgetsView::new(&self.state.budgets, |category| {
            self.calculate_spent_for_category(category)
        })
    }

    async fn load_ai(&mut self) {
        if self.sample_questions.is_none() {
            match self.api.get_sample_questions().await {
                Ok(questions) => self.sample_questions = Some(questions),
                Err(e) => tracing::warn!(error = %e, "Failed to load sample questions"),
            }
        }

        if let Some(questions) = &self.sample_questions {
            self.view.render_sample_questions(questions);
        }
        self.view.render_ai(&self.ai_panel);
    }

    pub async fn submit_expense(&mut self, form: &ExpenseForm) {
        let result = self.try_submit_expense(form).await;
        self.finish(result);
    }

    async fn try_submit_expense(&mut self, form: &ExpenseForm) -> Result<(), HandlerError> {
        let expense = form.validate(Utc::now())?;

        self.set_loading(true);
        let created = self
            .api
            .create_expense(&expense)
            .await
            .map_err(backend("Failed to add expense"))?;

        tracing::info!(
            id = created.id,
            amount = created.amount,
            category = %created.category,
            "Expense created"
        );
        self.state.expenses.push(created);
        self.notify_success("Expense added successfully!");
        self.view.reset_form(FormKind::Expense);
        self.load_expenses();

        if self.state.current_section == Section::Dashboard {
            self.update_dashboard().await;
        }
        Ok(())
    }

    pub async fn submit_budget(&mut self, form: &BudgetForm) {
        let result = self.try_submit_budget(form).await;
        self.finish(result);
    }

    async fn try_submit_budget(&mut self, form: &BudgetForm) -> Result<(), HandlerError> {
        let budget = form.validate()?;

        self.set_loading(true);
        let created = self
            .api
            .create_budget(&budget)
            .await
            .map_err(backend("Failed to create budget"))?;

        tracing::info!(
            category = %created.category,
            amount = created.amount,
            period = %created.period,
            "Budget created"
        );
        self.state.budgets.push(created);
        self.notify_success("Budget created successfully!");
        self.view.reset_form(FormKind::Budget);
        self.load_budgets();
        Ok(())
    }

    pub async fn submit_ai_question(&mut self, question: &str) {
        let result = self.try_submit_ai_question(question).await;
        self.finish(result);
    }

    async fn try_submit_ai_question(&mut self, question: &str) -> Result<(), HandlerError> {
        let question = validate_question(question)?;

        self.set_loading(true);
        self.ai_panel = AiPanel::Loading(AI_LOADING);
        self.view.render_ai(&self.ai_panel);

        let result = self
            .api
            .get_ai_insights(&self.state.expenses, question)
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.ai_panel = AiPanel::Idle;
                self.view.render_ai(&self.ai_panel);
                return Err(backend("Failed to get AI insights. Please try again.")(e));
            }
        };

        self.ai_panel = AiPanel::Insight(InsightView::from(&response));
        self.view.render_ai(&self.ai_panel);
        self.view.reset_form(FormKind::Question);
        Ok(())
    }

    /// Confirm, then delete the expense on the backend and drop it locally
    pub async fn delete_expense(&mut self, id: i64) {
        if !self.view.confirm(DELETE_PROMPT) {
            tracing::debug!(id, "Expense deletion cancelled");
            return;
        }

        let result = self.try_delete_expense(id).await;
        self.finish(result);
    }

    async fn try_delete_expense(&mut self, id: i64) -> Result<(), HandlerError> {
        self.set_loading(true);
        self.api
            .delete_expense(id)
            .await
            .map_err(backend("Failed to delete expense"))?;

        if !self.state.remove_expense(id) {
            tracing::debug!(id, "Deleted expense was not in the local cache");
        }
        self.notify_success("Expense deleted successfully!");
        self.load_expenses();

        if self.state.current_section == Section::Dashboard {
            self.update_dashboard().await;
        }
        Ok(())
    }

    /// Restore the backend's demo data and reload everything
    pub async fn reset_demo_data(&mut self) {
        let result = self.try_reset_demo_data().await;
        self.finish(result);
    }

    async fn try_reset_demo_data(&mut self) -> Result<(), HandlerError> {
        self.set_loading(true);
        let summary = self
            .api
            .reset_test_data()
            .await
            .map_err(backend("Failed to reset test data"))?;

        // A failed reload has already shown its own error
        if self.load_initial_data().await {
            self.notify_success(format!(
                "Test data reset! {} expenses and {} budgets loaded.",
                summary.expenses_count, summary.budgets_count
            ));
        }

        match self.state.current_section {
            Section::Dashboard => self.update_dashboard().await,
            Section::Expenses => self.load_expenses(),
            Section::Budgets => self.load_budgets(),
            Section::Ai => self.view.render_ai(&self.ai_panel),
        }
        Ok(())
    }

    /// Sum of cached expense amounts in exactly `category`
    pub fn calculate_spent_for_category(&self, category: &str) -> f64 {
        self.state.spent_for_category(category)
    }

    pub fn fill_ai_question(&mut self, question: &str) {
        self.view.fill_question(question);
    }

    fn use_sample_question(&mut self, index: usize) {
        let question = self
            .sample_questions
            .as_ref()
            .and_then(|questions| questions.get(index))
            .cloned();

        match question {
            Some(question) => self.fill_ai_question(&question),
            None => tracing::debug!(index, "No sample question at index"),
        }
    }

    fn finish(&mut self, result: Result<(), HandlerError>) {
        if result.is_err() {
            self.failures += 1;
        }
        match result {
            Ok(()) => {}
            Err(HandlerError::Invalid(e)) => self.notify_error(e.to_string()),
            Err(HandlerError::Backend { message, source }) => {
                tracing::error!(error = %source, "{}", message);
                self.notify_error(message);
            }
        }
        self.set_loading(false);
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
        self.view.set_loading(loading);
    }

    fn notify_success(&mut self, message: impl Into<String>) {
        let notice = self.notices.success(message);
        self.view.show_notice(notice);
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        let notice = self.notices.error(message);
        self.view.show_notice(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        ApiResult, Budget, DeleteAck, Expense, HealthStatus, InsightResponse, MonthlyReport,
        NewBudget, NewExpense, ResetSummary,
    };
    use crate::app::notice::NoticeKind;
    use crate::app::state::spending_by_category;
    use crate::app::view::{BudgetProgress, DashboardView, ExpensesView};
    use crate::charts::{TextChartBackend, TextSurface};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        expenses: Mutex<Vec<Expense>>,
        budgets: Mutex<Vec<Budget>>,
        calls: Mutex<Vec<&'static str>>,
        fail: Mutex<Vec<&'static str>>,
    }

    impl FakeApi {
        fn with_data(expenses: Vec<Expense>, budgets: Vec<Budget>) -> Self {
            Self {
                expenses: Mutex::new(expenses),
                budgets: Mutex::new(budgets),
                ..Default::default()
            }
        }

        fn failing(self, operation: &'static str) -> Self {
            self.fail.lock().unwrap().push(operation);
            self
        }

        fn record(&self, operation: &'static str) -> ApiResult<()> {
            self.calls.lock().unwrap().push(operation);
            if self.fail.lock().unwrap().contains(&operation) {
                return Err(ApiError::Status { status: 500 });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, operation: &str) -> usize {
            self.calls().iter().filter(|c| **c == operation).count()
        }
    }

    #[async_trait]
    impl BudgetApi for FakeApi {
        async fn get_expenses(&self) -> ApiResult<Vec<Expense>> {
            self.record("get_expenses")?;
            Ok(self.expenses.lock().unwrap().clone())
        }

        async fn create_expense(&self, expense: &NewExpense) -> ApiResult<Expense> {
            self.record("create_expense")?;
            let mut expenses = self.expenses.lock().unwrap();
            let created = Expense {
                id: expenses.len() as i64 + 100,
                amount: expense.amount,
                category: expense.category.clone(),
                description: expense.description.clone(),
                date: expense.date.clone(),
            };
            expenses.push(created.clone());
            Ok(created)
        }

        async fn delete_expense(&self, id: i64) -> ApiResult<DeleteAck> {
            self.record("delete_expense")?;
            self.expenses.lock().unwrap().retain(|e| e.id != id);
            Ok(DeleteAck::default())
        }

        async fn get_budgets(&self) -> ApiResult<Vec<Budget>> {
            self.record("get_budgets")?;
            Ok(self.budgets.lock().unwrap().clone())
        }

        async fn create_budget(&self, budget: &NewBudget) -> ApiResult<Budget> {
            self.record("create_budget")?;
            let mut budgets = self.budgets.lock().unwrap();
            let created = Budget {
                id: Some(budgets.len() as i64 + 1),
                category: budget.category.clone(),
                amount: budget.amount,
                period: budget.period.clone(),
            };
            budgets.push(created.clone());
            Ok(created)
        }

        async fn get_ai_insights(
            &self,
            expenses: &[Expense],
            question: &str,
        ) -> ApiResult<InsightResponse> {
            self.record("get_ai_insights")?;
            Ok(InsightResponse {
                insight: format!("{} ({} expenses)", question, expenses.len()),
                recommendations: vec![
                    "Try meal planning".to_string(),
                    "Track your spending weekly".to_string(),
                ],
                summary: None,
            })
        }

        async fn get_monthly_report(&self) -> ApiResult<MonthlyReport> {
            self.record("get_monthly_report")?;
            let expenses = self.expenses.lock().unwrap();
            Ok(MonthlyReport {
                total_spent: expenses.iter().map(|e| e.amount).sum(),
                expense_count: expenses.len() as u64,
                category_breakdown: spending_by_category(&expenses),
            })
        }

        async fn health_check(&self) -> ApiResult<HealthStatus> {
            self.record("health_check")?;
            Ok(HealthStatus {
                status: "healthy".to_string(),
                timestamp: None,
            })
        }

        async fn get_sample_questions(&self) -> ApiResult<Vec<String>> {
            self.record("get_sample_questions")?;
            Ok(vec![
                "How can I reduce my spending on food?".to_string(),
                "What's my biggest expense category?".to_string(),
            ])
        }

        async fn reset_test_data(&self) -> ApiResult<ResetSummary> {
            self.record("reset_test_data")?;
            *self.expenses.lock().unwrap() = vec![expense(1, 45.67, "food")];
            *self.budgets.lock().unwrap() = vec![budget("food", 400.0)];
            Ok(ResetSummary {
                message: "Test data has been reset".to_string(),
                expenses_count: 1,
                budgets_count: 1,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Rendered {
        Section(Section),
        Dashboard(DashboardView),
        Expenses(ExpensesView),
        Budgets(BudgetsView),
        Ai(AiPanel),
        Samples(usize),
        Filled(String),
        Reset(FormKind),
        Notice(NoticeKind, String),
        Confirm,
    }

    struct FakeView {
        rendered: Vec<Rendered>,
        loading: Vec<bool>,
        confirm_answer: bool,
    }

    impl Default for FakeView {
        fn default() -> Self {
            Self {
                rendered: Vec::new(),
                loading: Vec::new(),
                confirm_answer: true,
            }
        }
    }

    impl FakeView {
        fn last_notice(&self) -> Option<(NoticeKind, String)> {
            self.rendered.iter().rev().find_map(|r| match r {
                Rendered::Notice(kind, message) => Some((*kind, message.clone())),
                _ => None,
            })
        }

        fn count(&self, pred: impl Fn(&Rendered) -> bool) -> usize {
            self.rendered.iter().filter(|r| pred(r)).count()
        }
    }

    impl View for FakeView {
        fn show_section(&mut self, section: Section) {
            self.rendered.push(Rendered::Section(section));
        }

        fn render_dashboard(&mut self, dashboard: &DashboardView) {
            self.rendered.push(Rendered::Dashboard(dashboard.clone()));
        }

        fn render_expenses(&mut self, expenses: &ExpensesView) {
            self.rendered.push(Rendered::Expenses(expenses.clone()));
        }

        fn render_budgets(&mut self, budgets: &BudgetsView) {
            self.rendered.push(Rendered::Budgets(budgets.clone()));
        }

        fn render_ai(&mut self, panel: &AiPanel) {
            self.rendered.push(Rendered::Ai(panel.clone()));
        }

        fn render_sample_questions(&mut self, questions: &[String]) {
            self.rendered.push(Rendered::Samples(questions.len()));
        }

        fn fill_question(&mut self, question: &str) {
            self.rendered.push(Rendered::Filled(question.to_string()));
        }

        fn reset_form(&mut self, form: FormKind) {
            self.rendered.push(Rendered::Reset(form));
        }

        fn show_notice(&mut self, notice: &Notice) {
            self.rendered
                .push(Rendered::Notice(notice.kind, notice.message.clone()));
        }

        fn confirm(&mut self, _prompt: &str) -> bool {
            self.rendered.push(Rendered::Confirm);
            self.confirm_answer
        }

        fn set_loading(&mut self, loading: bool) {
            self.loading.push(loading);
        }
    }

    type TestController = Controller<FakeApi, FakeView, TextChartBackend>;

    fn expense(id: i64, amount: f64, category: &str) -> Expense {
        Expense {
            id,
            amount,
            category: category.to_string(),
            description: String::new(),
            date: "2024-01-05T09:30:00".to_string(),
        }
    }

    fn budget(category: &str, amount: f64) -> Budget {
        Budget {
            id: None,
            category: category.to_string(),
            amount,
            period: Default::default(),
        }
    }

    fn controller(api: FakeApi) -> (TestController, TextSurface) {
        let surface = TextSurface::with_mounts(&[SPENDING_CHART, BUDGET_CHART, TREND_CHART]);
        let charts = ChartManager::new(TextChartBackend::new(surface.clone()));
        (
            Controller::new(api, FakeView::default(), charts, Notices::default()),
            surface,
        )
    }

    async fn initialized(api: FakeApi) -> (TestController, TextSurface) {
        let (mut controller, surface) = controller(api);
        controller.initialize().await;
        (controller, surface)
    }

    #[tokio::test]
    async fn test_initialize_loads_and_opens_dashboard() {
        let api = FakeApi::with_data(
            vec![expense(1, 45.67, "food"), expense(2, 3.5, "transport")],
            vec![budget("food", 400.0)],
        );
        let (controller, surface) = initialized(api).await;

        assert_eq!(controller.state().expenses.len(), 2);
        assert_eq!(controller.state().budgets.len(), 1);
        assert_eq!(controller.state().current_section, Section::Dashboard);
        assert!(!controller.state().is_loading);

        let dashboard = controller.view().rendered.iter().find_map(|r| match r {
            Rendered::Dashboard(d) => Some(d.clone()),
            _ => None,
        });
        let dashboard = dashboard.unwrap();
        assert_eq!(dashboard.total_spent, "$49.17");
        assert_eq!(dashboard.expense_count, 2);
        assert_eq!(dashboard.budget_count, 1);

        assert!(surface.contents(SPENDING_CHART).unwrap().contains("food"));
        assert!(surface.contents(TREND_CHART).unwrap().contains("Jan 2024"));
    }

    #[tokio::test]
    async fn test_initial_load_fails_when_budgets_fail() {
        let api = FakeApi::with_data(vec![expense(1, 10.0, "food")], vec![]).failing("get_budgets");
        let (mut controller, _) = controller(api);

        assert!(!controller.load_initial_data().await);
        assert!(!controller.state().is_loading);
        assert!(controller.state().expenses.is_empty());
        assert_eq!(
            controller.view().last_notice(),
            Some((
                NoticeKind::Error,
                "Failed to load data. Please refresh the page.".to_string()
            ))
        );
        assert_eq!(controller.view().loading, vec![true, false]);
    }

    #[tokio::test]
    async fn test_dispatch_before_initialize_ignored() {
        let (mut controller, _) = controller(FakeApi::default());
        controller
            .dispatch(Event::SubmitExpense(ExpenseForm::new("5", "food", "")))
            .await;

        assert!(controller.api().calls().is_empty());
        assert!(controller.state().expenses.is_empty());
    }

    #[tokio::test]
    async fn test_submit_expense_appends_server_record() {
        let (mut controller, _) = initialized(FakeApi::with_data(
            vec![expense(1, 45.67, "food")],
            vec![],
        ))
        .await;
        controller.show_section(Section::Expenses).await;

        controller
            .dispatch(Event::SubmitExpense(ExpenseForm::new("25.50", "food", "Coffee")))
            .await;

        let state = controller.state();
        assert_eq!(state.expenses.len(), 2);
        let server_copy = controller.api().expenses.lock().unwrap().last().cloned();
        assert_eq!(state.expenses.last().cloned(), server_copy);
        assert_eq!(state.expenses[1].amount, 25.5);
        assert!(!state.is_loading);

        let view = controller.view();
        assert!(view.rendered.contains(&Rendered::Reset(FormKind::Expense)));
        assert_eq!(
            view.last_notice(),
            Some((NoticeKind::Success, "Expense added successfully!".to_string()))
        );
        // Not on the dashboard, so no report refresh beyond initialize
        assert_eq!(controller.api().count("get_monthly_report"), 1);
    }

    #[tokio::test]
    async fn test_submit_expense_on_dashboard_refreshes_it() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        controller
            .submit_expense(&ExpenseForm::new("12", "transport", "Metro"))
            .await;

        assert_eq!(controller.api().count("get_monthly_report"), 2);
    }

    #[tokio::test]
    async fn test_invalid_amount_makes_no_network_call() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        let before = controller.api().calls().len();

        for amount in ["0", "-12.5"] {
            controller
                .submit_expense(&ExpenseForm::new(amount, "food", ""))
                .await;
            assert_eq!(
                controller.view().last_notice(),
                Some((NoticeKind::Error, "Please enter a valid amount".to_string()))
            );
        }

        assert_eq!(controller.api().calls().len(), before);
        assert!(controller.state().expenses.is_empty());
        assert!(!controller.state().is_loading);
    }

    #[tokio::test]
    async fn test_missing_category_rejected() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        controller.submit_expense(&ExpenseForm::new("5", "", "")).await;

        assert_eq!(controller.api().count("create_expense"), 0);
        assert_eq!(
            controller.view().last_notice().unwrap().1,
            "Please select a category"
        );
    }

    #[tokio::test]
    async fn test_create_failure_clears_loading() {
        let (mut controller, _) =
            initialized(FakeApi::default().failing("create_expense")).await;
        controller
            .submit_expense(&ExpenseForm::new("5", "food", ""))
            .await;

        assert!(!controller.state().is_loading);
        assert_eq!(controller.view().loading.last(), Some(&false));
        assert!(controller.state().expenses.is_empty());
        assert_eq!(
            controller.view().last_notice(),
            Some((NoticeKind::Error, "Failed to add expense".to_string()))
        );
    }

    #[tokio::test]
    async fn test_calculate_spent_for_category() {
        let (controller, _) = initialized(FakeApi::with_data(
            vec![
                expense(1, 45.67, "food"),
                expense(2, 18.5, "food"),
                expense(3, 60.0, "transport"),
            ],
            vec![],
        ))
        .await;

        assert!((controller.calculate_spent_for_category("food") - 64.17).abs() < 1e-9);
        assert_eq!(controller.calculate_spent_for_category("transport"), 60.0);
        assert_eq!(controller.calculate_spent_for_category("shopping"), 0.0);
    }

    #[tokio::test]
    async fn test_over_budget_progress() {
        let (mut controller, surface) = initialized(FakeApi::with_data(
            vec![expense(1, 300.0, "food"), expense(2, 200.0, "food")],
            vec![budget("food", 400.0)],
        ))
        .await;
        controller.show_section(Section::Budgets).await;

        let BudgetsView::Rows(rows) = controller.budgets_view() else {
            panic!("expected budget rows");
        };
        assert_eq!(rows[0].percentage, 125.0);
        assert_eq!(rows[0].fill, 100.0);
        assert_eq!(rows[0].caption(), "Spent: $500.00 (125.0%)");
        assert!(surface.contents(BUDGET_CHART).unwrap().contains("Spent"));
    }

    #[tokio::test]
    async fn test_new_budget_without_spending() {
        let (mut controller, _) =
            initialized(FakeApi::with_data(vec![expense(1, 20.0, "food")], vec![])).await;

        controller
            .dispatch(Event::SubmitBudget(BudgetForm::new("entertainment", "100", "")))
            .await;

        assert_eq!(controller.state().budgets.len(), 1);
        let progress = BudgetProgress::new(
            &controller.state().budgets[0],
            controller.calculate_spent_for_category("entertainment"),
        );
        assert_eq!(progress.spent, 0.0);
        assert_eq!(progress.percentage, 0.0);
        assert_eq!(progress.caption(), "Spent: $0.00 (0.0%)");

        // Budgets never refresh the dashboard
        assert_eq!(controller.api().count("get_monthly_report"), 1);
        assert!(controller
            .view()
            .rendered
            .contains(&Rendered::Reset(FormKind::Budget)));
    }

    #[tokio::test]
    async fn test_delete_confirmed() {
        let (mut controller, _) = initialized(FakeApi::with_data(
            vec![expense(1, 10.0, "food"), expense(2, 20.0, "food")],
            vec![],
        ))
        .await;

        controller.dispatch(Event::DeleteExpense(1)).await;

        assert_eq!(controller.state().expenses.len(), 1);
        assert_eq!(controller.state().expenses[0].id, 2);
        assert_eq!(
            controller.view().last_notice().unwrap().1,
            "Expense deleted successfully!"
        );
        // On the dashboard, so the report is fetched again
        assert_eq!(controller.api().count("get_monthly_report"), 2);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_keeps_list() {
        let (mut controller, _) =
            initialized(FakeApi::with_data(vec![expense(1, 10.0, "food")], vec![])).await;
        let before = controller.state().expenses.clone();

        controller.delete_expense(999).await;
        controller.delete_expense(999).await;

        assert_eq!(controller.state().expenses, before);
        assert_eq!(controller.api().count("delete_expense"), 2);
    }

    #[tokio::test]
    async fn test_delete_cancelled() {
        let (mut controller, _) =
            initialized(FakeApi::with_data(vec![expense(1, 10.0, "food")], vec![])).await;
        controller.view.confirm_answer = false;

        controller.delete_expense(1).await;

        assert_eq!(controller.api().count("delete_expense"), 0);
        assert_eq!(controller.state().expenses.len(), 1);
        assert_eq!(controller.view().count(|r| *r == Rendered::Confirm), 1);
    }

    #[tokio::test]
    async fn test_ai_question_shows_placeholder_then_insight() {
        let (mut controller, _) =
            initialized(FakeApi::with_data(vec![expense(1, 10.0, "food")], vec![])).await;
        controller.show_section(Section::Ai).await;

        controller
            .dispatch(Event::AskQuestion("  How can I save money?  ".to_string()))
            .await;

        let panels: Vec<AiPanel> = controller
            .view()
            .rendered
            .iter()
            .filter_map(|r| match r {
                Rendered::Ai(panel) => Some(panel.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(panels[panels.len() - 2], AiPanel::Loading(AI_LOADING));

        let AiPanel::Insight(insight) = controller.ai_panel() else {
            panic!("expected insight");
        };
        assert_eq!(insight.insight, "How can I save money? (1 expenses)");
        assert_eq!(
            insight.recommendations,
            vec!["Try meal planning", "Track your spending weekly"]
        );
        assert!(controller
            .view()
            .rendered
            .contains(&Rendered::Reset(FormKind::Question)));
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        controller.submit_ai_question("   ").await;

        assert_eq!(controller.api().count("get_ai_insights"), 0);
        assert_eq!(
            controller.view().last_notice().unwrap().1,
            "Please enter a question"
        );
    }

    #[tokio::test]
    async fn test_ai_failure_restores_panel() {
        let (mut controller, _) =
            initialized(FakeApi::default().failing("get_ai_insights")).await;
        controller.submit_ai_question("Where does it go?").await;

        assert_eq!(controller.ai_panel(), &AiPanel::Idle);
        assert!(!controller.state().is_loading);
        assert_eq!(
            controller.view().last_notice().unwrap().1,
            "Failed to get AI insights. Please try again."
        );
    }

    #[tokio::test]
    async fn test_sample_questions_fetched_once() {
        let (mut controller, _) = initialized(FakeApi::default()).await;

        controller.dispatch(Event::Navigate(Section::Ai)).await;
        controller.dispatch(Event::Navigate(Section::Expenses)).await;
        controller.dispatch(Event::Navigate(Section::Ai)).await;
        controller.dispatch(Event::UseSampleQuestion(1)).await;
        controller.dispatch(Event::UseSampleQuestion(9)).await;

        assert_eq!(controller.api().count("get_sample_questions"), 1);
        assert_eq!(
            controller.view().count(|r| matches!(r, Rendered::Filled(_))),
            1
        );
        assert!(controller.view().rendered.contains(&Rendered::Filled(
            "What's my biggest expense category?".to_string()
        )));
    }

    #[tokio::test]
    async fn test_navigation_uses_cache() {
        let (mut controller, _) =
            initialized(FakeApi::with_data(vec![expense(1, 10.0, "food")], vec![])).await;
        let before = controller.api().calls().len();

        controller.show_section(Section::Expenses).await;
        controller.show_section(Section::Budgets).await;

        assert_eq!(controller.api().calls().len(), before);
        assert_eq!(controller.state().current_section, Section::Budgets);
        assert!(controller
            .view()
            .rendered
            .contains(&Rendered::Budgets(BudgetsView::Empty(crate::app::view::NO_BUDGETS))));
    }

    #[tokio::test]
    async fn test_empty_dashboard_shows_message() {
        let (_controller, surface) = initialized(FakeApi::default()).await;
        assert_eq!(
            surface.contents(SPENDING_CHART).as_deref(),
            Some(NO_SPENDING_DATA)
        );
        assert!(surface.contents(TREND_CHART).is_none());
    }

    #[tokio::test]
    async fn test_reset_reloads_active_section() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        controller.show_section(Section::Expenses).await;

        controller.dispatch(Event::ResetDemoData).await;

        assert_eq!(controller.state().expenses.len(), 1);
        assert_eq!(controller.state().budgets.len(), 1);
        assert!(!controller.state().is_loading);
        assert_eq!(
            controller.view().last_notice().unwrap().1,
            "Test data reset! 1 expenses and 1 budgets loaded."
        );
        assert!(matches!(
            controller.view().rendered.last(),
            Some(Rendered::Expenses(ExpensesView::Rows(_)))
        ));
    }

    #[tokio::test]
    async fn test_reset_failure() {
        let (mut controller, _) =
            initialized(FakeApi::default().failing("reset_test_data")).await;
        controller.reset_demo_data().await;

        assert_eq!(
            controller.view().last_notice(),
            Some((NoticeKind::Error, "Failed to reset test data".to_string()))
        );
        assert_eq!(controller.api().count("get_expenses"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_auto_dismissed() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        controller.submit_expense(&ExpenseForm::new("0", "food", "")).await;
        assert!(controller.notice().is_some());

        tokio::time::advance(std::time::Duration::from_secs(5)).await;
        assert!(controller.notice().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_outlives_notice() {
        let (mut controller, _) =
            initialized(FakeApi::default().failing("reset_test_data")).await;
        assert!(!controller.has_failed());

        controller.reset_demo_data().await;
        tokio::time::advance(std::time::Duration::from_secs(30)).await;

        assert!(controller.notice().is_none());
        assert!(controller.has_failed());
    }

    #[tokio::test]
    async fn test_failed_reload_after_reset_counts() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        controller.api.fail.lock().unwrap().push("get_budgets");

        controller.reset_demo_data().await;

        assert!(controller.has_failed());
        assert_eq!(
            controller.view().last_notice().unwrap().1,
            "Failed to load data. Please refresh the page."
        );
    }

    #[tokio::test]
    async fn test_successful_session_has_no_failure() {
        let (mut controller, _) = initialized(FakeApi::default()).await;
        controller.delete_expense(3).await;
        controller.view.confirm_answer = false;
        controller.delete_expense(3).await;

        assert!(!controller.has_failed());
    }
}
