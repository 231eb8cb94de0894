//! Text chart backend
//!
//! Draws charts as horizontal text bars into a shared [`TextSurface`], the
//! terminal counterpart of a page full of canvases. Mount points must be
//! registered on the surface before charts can be drawn on them.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::config::{ChartConfig, ChartKind};
use super::manager::{ChartBackend, ChartHandle};

/// Mount points shared by the chart backend and the view that prints them
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    mounts: Arc<Mutex<BTreeMap<String, Option<String>>>>,
}

impl TextSurface {
    pub fn with_mounts(mounts: &[&str]) -> Self {
        let surface = Self::default();
        for mount in mounts {
            surface.add_mount(mount);
        }
        surface
    }

    pub fn add_mount(&self, mount: &str) {
        self.lock().entry(mount.to_string()).or_insert(None);
    }

    pub fn has_mount(&self, mount: &str) -> bool {
        self.lock().contains_key(mount)
    }

    /// Current contents of `mount`, if anything is drawn there
    pub fn contents(&self, mount: &str) -> Option<String> {
        self.lock().get(mount).cloned().flatten()
    }

    fn draw(&self, mount: &str, text: String) -> bool {
        match self.lock().get_mut(mount) {
            Some(slot) => {
                *slot = Some(text);
                true
            }
            None => false,
        }
    }

    fn clear(&self, mount: &str) {
        if let Some(slot) = self.lock().get_mut(mount) {
            *slot = None;
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Option<String>>> {
        self.mounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`ChartBackend`] that renders into a [`TextSurface`]
#[derive(Debug, Clone)]
pub struct TextChartBackend {
    surface: TextSurface,
    width: usize,
}

impl TextChartBackend {
    pub fn new(surface: TextSurface) -> Self {
        Self { surface, width: 30 }
    }
}

impl ChartBackend for TextChartBackend {
    type Handle = TextChart;

    fn mount(&mut self, mount: &str, config: &ChartConfig) -> Option<TextChart> {
        if !self.surface.draw(mount, render(config, self.width)) {
            return None;
        }
        Some(TextChart {
            mount: mount.to_string(),
            surface: self.surface.clone(),
            width: self.width,
        })
    }

    fn show_message(&mut self, mount: &str, message: &str) {
        self.surface.draw(mount, message.to_string());
    }
}

/// A chart drawn on a [`TextSurface`]
#[derive(Debug)]
pub struct TextChart {
    mount: String,
    surface: TextSurface,
    width: usize,
}

impl ChartHandle for TextChart {
    fn update(&mut self, config: &ChartConfig) {
        self.surface.draw(&self.mount, render(config, self.width));
    }

    fn destroy(self) {
        self.surface.clear(&self.mount);
    }
}

/// Render a chart config as text
pub fn render(config: &ChartConfig, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&config.options.title);
    out.push('\n');

    let labels = &config.data.labels;
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let max = config
        .data
        .datasets
        .iter()
        .flat_map(|d| d.data.iter().copied())
        .fold(0.0_f64, f64::max);

    for (index, label) in labels.iter().enumerate() {
        match config.kind {
            ChartKind::Doughnut | ChartKind::Line => {
                let value = config
                    .data
                    .datasets
                    .first()
                    .and_then(|d| d.data.get(index).copied())
                    .unwrap_or(0.0);
                let suffix = match config.kind {
                    ChartKind::Doughnut => config
                        .tooltip(0, index)
                        .and_then(|t| t.rsplit_once(' ').map(|(_, pct)| pct.to_string()))
                        .unwrap_or_default(),
                    _ => String::new(),
                };
                out.push_str(&format!(
                    "{:<lw$} {} ${:.2} {}\n",
                    label,
                    bar(value, max, width),
                    value,
                    suffix,
                    lw = label_width
                ));
            }
            ChartKind::Bar => {
                for dataset in &config.data.datasets {
                    let value = dataset.data.get(index).copied().unwrap_or(0.0);
                    out.push_str(&format!(
                        "{:<lw$} {:<6} {} ${:.2}\n",
                        label,
                        dataset.label,
                        bar(value, max, width),
                        value,
                        lw = label_width
                    ));
                }
            }
        }
    }

    // Trailing spaces from empty suffixes are noise
    out.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max) * width as f64).round().clamp(0.0, width as f64) as usize
    } else {
        0
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
