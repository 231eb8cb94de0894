//! Application Controller
//!
//! - [`state`]: session state and local aggregates
//! - [`forms`]: form input and validation
//! - [`notice`]: self-dismissing notices
//! - [`view`]: view models and the [`View`] rendering trait
//! - [`controller`]: event handling

pub mod controller;
pub mod forms;
pub mod notice;
pub mod state;
pub mod view;

pub use controller::{Controller, Event};
pub use forms::{validate_question, BudgetForm, ExpenseForm, ValidationError, CATEGORIES};
pub use notice::{Notice, NoticeKind, Notices};
pub use state::{AppState, Section};
pub use view::{
    AiPanel, BudgetProgress, BudgetsView, DashboardView, ExpenseRow, ExpensesView, FormKind,
    InsightView, View,
};
