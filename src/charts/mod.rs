//! Chart Renderer
//!
//! A thin adapter between spending aggregates and a drawing backend.
//!
//! - [`config`]: aggregate -> chart configuration shaping
//! - [`manager`]: mount-point registry with create/update/destroy lifecycle
//! - [`text`]: terminal backend drawing text bars

pub mod config;
pub mod manager;
pub mod text;

pub use config::{palette, ChartConfig, ChartData, ChartKind, Dataset, TrendSeries};
pub use manager::{ChartBackend, ChartHandle, ChartManager};
pub use text::{TextChart, TextChartBackend, TextSurface};

/// Mount point for the dashboard's category doughnut
pub const SPENDING_CHART: &str = "spending-chart";

/// Mount point for the budgets section's budget vs actual bars
pub const BUDGET_CHART: &str = "budget-chart";

/// Mount point for the dashboard's monthly trend line
pub const TREND_CHART: &str = "trend-chart";
