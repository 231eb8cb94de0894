//! Chart configurations
//!
//! Shapes domain aggregates into the structure a charting library expects
//! (labels plus datasets with per-point colors). Serializes to the familiar
//! `{type, data: {labels, datasets}, options}` JSON layout.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::{Budget, Expense};
use crate::app::state::spending_by_category;

/// Application color scheme
pub mod palette {
    pub const PRIMARY: &str = "#667eea";
    pub const SECONDARY: &str = "#764ba2";
    pub const SUCCESS: &str = "#27ae60";
    pub const WARNING: &str = "#f39c12";
    pub const DANGER: &str = "#e74c3c";
    pub const INFO: &str = "#3498db";
    pub const LIGHT: &str = "#ecf0f1";
    pub const DARK: &str = "#2c3e50";

    /// Slice fills for category breakdowns
    pub const SERIES: [&str; 7] = [PRIMARY, SECONDARY, SUCCESS, WARNING, DANGER, INFO, LIGHT];

    /// Slice borders; the light fill gets a dark border
    pub const SERIES_BORDER: [&str; 7] = [PRIMARY, SECONDARY, SUCCESS, WARNING, DANGER, INFO, DARK];

    /// Append a two-digit alpha to a hex color
    pub fn with_alpha(color: &str, alpha: &str) -> String {
        format!("{}{}", color, alpha)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
    pub border_width: u32,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub title: String,
    pub legend: LegendPosition,
    pub begin_at_zero: bool,
    pub animation_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Monthly spending series for the trend line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl TrendSeries {
    /// Build from (year, month) totals, labelled `Jan 2024`
    pub fn from_monthly_totals(totals: &BTreeMap<(i32, u32), f64>) -> Self {
        let mut series = TrendSeries::default();
        for (&(year, month), &total) in totals {
            let label = chrono::NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{}-{:02}", year, month));
            series.labels.push(label);
            series.values.push(total);
        }
        series
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ChartConfig {
    /// Doughnut of spending by category
    pub fn spending(breakdown: &BTreeMap<String, f64>) -> Self {
        let count = breakdown.len();
        let cycle = |colors: &[&str]| -> Vec<String> {
            colors.iter().cycle().take(count).map(|c| c.to_string()).collect()
        };

        ChartConfig {
            kind: ChartKind::Doughnut,
            data: ChartData {
                labels: breakdown.keys().cloned().collect(),
                datasets: vec![Dataset {
                    label: "Spending by Category".to_string(),
                    data: breakdown.values().copied().collect(),
                    background_color: cycle(&palette::SERIES),
                    border_color: cycle(&palette::SERIES_BORDER),
                    border_width: 2,
                    fill: false,
                }],
            },
            options: ChartOptions {
                title: "Spending by Category".to_string(),
                legend: LegendPosition::Bottom,
                begin_at_zero: false,
                animation_ms: 1000,
            },
        }
    }

    /// Grouped bars of budget vs actual spending, one group per budget
    pub fn budget_vs_actual(budgets: &[Budget], expenses: &[Expense]) -> Self {
        let spent = spending_by_category(expenses);
        let count = budgets.len();

        let dataset = |label: &str, color: &str, data: Vec<f64>| Dataset {
            label: label.to_string(),
            data,
            background_color: vec![palette::with_alpha(color, "40"); count],
            border_color: vec![color.to_string(); count],
            border_width: 2,
            fill: false,
        };

        ChartConfig {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: budgets.iter().map(|b| b.category.clone()).collect(),
                datasets: vec![
                    dataset(
                        "Budget",
                        palette::PRIMARY,
                        budgets.iter().map(|b| b.amount).collect(),
                    ),
                    dataset(
                        "Spent",
                        palette::DANGER,
                        budgets
                            .iter()
                            .map(|b| spent.get(&b.category).copied().unwrap_or(0.0))
                            .collect(),
                    ),
                ],
            },
            options: ChartOptions {
                title: "Budget vs Actual Spending".to_string(),
                legend: LegendPosition::Top,
                begin_at_zero: true,
                animation_ms: 1000,
            },
        }
    }

    /// Filled line of monthly spending
    pub fn trend(series: &TrendSeries) -> Self {
        ChartConfig {
            kind: ChartKind::Line,
            data: ChartData {
                labels: series.labels.clone(),
                datasets: vec![Dataset {
                    label: "Monthly Spending".to_string(),
                    data: series.values.clone(),
                    background_color: vec![palette::with_alpha(palette::PRIMARY, "20")],
                    border_color: vec![palette::PRIMARY.to_string()],
                    border_width: 3,
                    fill: true,
                }],
            },
            options: ChartOptions {
                title: "Monthly Spending Trend".to_string(),
                legend: LegendPosition::Hidden,
                begin_at_zero: true,
                animation_ms: 1000,
            },
        }
    }

    /// Tooltip text for point `index` of dataset `dataset`
    pub fn tooltip(&self, dataset: usize, index: usize) -> Option<String> {
        let set = self.data.datasets.get(dataset)?;
        let value = *set.data.get(index)?;
        let label = self.data.labels.get(index).map(String::as_str).unwrap_or("");

        Some(match self.kind {
            ChartKind::Doughnut => {
                let total: f64 = set.data.iter().sum();
                let percentage = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                format!("{}: ${:.2} ({:.1}%)", label, value, percentage)
            }
            ChartKind::Bar => format!("{}: ${:.2}", set.label, value),
            ChartKind::Line => format!("Spending: ${:.2}", value),
        })
    }
}
