//! # Budget Buddy
//!
//! Client for a budgeting backend: record expenses, set per-category budgets,
//! watch spending against them and ask an AI assistant about it.
//!
//! ## Modules
//!
//! - [`api`]: REST transport, one typed call per backend operation
//! - [`app`]: controller state machine and pure view models
//! - [`charts`]: chart configuration and mount-point lifecycle
//! - [`terminal`]: plain-text view and shell command parser
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use budget_buddy::api::ApiClient;
//! use budget_buddy::app::{Controller, Notices};
//! use budget_buddy::charts::{ChartManager, TextChartBackend, TextSurface, SPENDING_CHART};
//! use budget_buddy::terminal::{ConfirmMode, TerminalView};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::new("http://localhost:8000", Duration::from_secs(30))?;
//!
//!     let surface = TextSurface::with_mounts(&[SPENDING_CHART]);
//!     let charts = ChartManager::new(TextChartBackend::new(surface.clone()));
//!     let view = TerminalView::new(std::io::stdout(), surface, ConfirmMode::Stdin);
//!
//!     let mut controller = Controller::new(api, view, charts, Notices::default());
//!     controller.initialize().await;
//!
//!     println!("{} expenses loaded", controller.state().expenses.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod charts;
pub mod config;
pub mod terminal;

pub use api::{ApiClient, ApiError, BudgetApi};
pub use app::{Controller, Event};
pub use config::Config;
