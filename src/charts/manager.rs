//! Chart lifecycle management
//!
//! Keeps at most one live chart per mount point. Creating a chart where one
//! already exists destroys the old one first.

use std::collections::{BTreeMap, HashMap};

use super::config::{ChartConfig, ChartKind, TrendSeries};
use crate::api::{Budget, Expense};

/// A drawing surface that charts can be mounted on
pub trait ChartBackend {
    type Handle: ChartHandle;

    /// Draw `config` at `mount`. `None` when the mount point does not exist.
    fn mount(&mut self, mount: &str, config: &ChartConfig) -> Option<Self::Handle>;

    /// Show a plain message at `mount` instead of a chart
    fn show_message(&mut self, mount: &str, message: &str);
}

/// A live chart owned by the manager
pub trait ChartHandle {
    /// Redraw with new data
    fn update(&mut self, config: &ChartConfig);

    /// Release the drawing resources
    fn destroy(self);
}

struct ActiveChart<H> {
    config: ChartConfig,
    handle: H,
}

/// Mount-point id -> active chart
pub struct ChartManager<B: ChartBackend> {
    backend: B,
    charts: HashMap<String, ActiveChart<B::Handle>>,
}

impl<B: ChartBackend> ChartManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            charts: HashMap::new(),
        }
    }

    /// Doughnut chart of spending by category
    pub fn create_spending_chart(
        &mut self,
        mount: &str,
        breakdown: &BTreeMap<String, f64>,
    ) -> Option<&ChartConfig> {
        self.create(mount, ChartConfig::spending(breakdown))
    }

    /// Bar chart comparing each budget with what was spent in its category
    pub fn create_budget_chart(
        &mut self,
        mount: &str,
        budgets: &[Budget],
        expenses: &[Expense],
    ) -> Option<&ChartConfig> {
        self.create(mount, ChartConfig::budget_vs_actual(budgets, expenses))
    }

    /// Line chart of monthly spending
    pub fn create_trend_chart(
        &mut self,
        mount: &str,
        series: &TrendSeries,
    ) -> Option<&ChartConfig> {
        self.create(mount, ChartConfig::trend(series))
    }

    /// Replace whatever is at `mount` with a chart built from `config`
    pub fn create(&mut self, mount: &str, config: ChartConfig) -> Option<&ChartConfig> {
        self.destroy_chart(mount);

        let Some(handle) = self.backend.mount(mount, &config) else {
            tracing::debug!(mount = %mount, "Chart mount point not found");
            return None;
        };

        let chart = self
            .charts
            .entry(mount.to_string())
            .or_insert(ActiveChart { config, handle });
        Some(&chart.config)
    }

    /// Swap the category data of an existing chart in place
    ///
    /// Only doughnut charts take new category data; other kinds are redrawn
    /// as they are. No-op when nothing is mounted at `mount`.
    pub fn update_chart(&mut self, mount: &str, breakdown: &BTreeMap<String, f64>) {
        let Some(chart) = self.charts.get_mut(mount) else {
            return;
        };

        if chart.config.kind == ChartKind::Doughnut {
            chart.config.data.labels = breakdown.keys().cloned().collect();
            if let Some(dataset) = chart.config.data.datasets.first_mut() {
                dataset.data = breakdown.values().copied().collect();
            }
        }

        chart.handle.update(&chart.config);
    }

    /// Destroy the chart at `mount` and leave `message` in its place
    pub fn show_empty(&mut self, mount: &str, message: &str) {
        self.destroy_chart(mount);
        self.backend.show_message(mount, message);
    }

    pub fn destroy_chart(&mut self, mount: &str) {
        if let Some(chart) = self.charts.remove(mount) {
            chart.handle.destroy();
        }
    }

    pub fn destroy_all_charts(&mut self) {
        for (_, chart) in self.charts.drain() {
            chart.handle.destroy();
        }
    }

    pub fn chart(&self, mount: &str) -> Option<&ChartConfig> {
        self.charts.get(mount).map(|c| &c.config)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl<B: ChartBackend> Drop for ChartManager<B> {
    fn drop(&mut self) {
        self.destroy_all_charts();
    }
}
