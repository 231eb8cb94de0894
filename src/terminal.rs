//! Terminal front end
//!
//! [`TerminalView`] prints view models as plain text, and
//! [`parse_shell_line`] turns interactive shell input into controller events.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::app::{
    AiPanel, BudgetForm, BudgetsView, DashboardView, Event, ExpenseForm, ExpensesView, FormKind,
    Notice, NoticeKind, Section, View,
};
use crate::charts::{TextSurface, BUDGET_CHART, SPENDING_CHART, TREND_CHART};

/// How [`TerminalView`] answers confirmation prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Answer yes without asking (`--yes`)
    AssumeYes,
    /// Ask on stdin
    Stdin,
    AlwaysNo,
}

/// [`View`] that writes to any [`Write`]r, normally stdout
pub struct TerminalView<W: Write> {
    out: W,
    surface: TextSurface,
    confirm: ConfirmMode,
}

impl<W: Write> TerminalView<W> {
    /// `surface` must be the one the chart backend draws on
    pub fn new(out: W, surface: TextSurface, confirm: ConfirmMode) -> Self {
        Self {
            out,
            surface,
            confirm,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn chart(&self, mount: &str) -> Option<String> {
        self.surface.contents(mount).map(|text| format!("\n{}\n", text))
    }
}

impl<W: Write> View for TerminalView<W> {
    fn show_section(&mut self, section: Section) {
        let title = match section {
            Section::Dashboard => "Dashboard",
            Section::Expenses => "Expenses",
            Section::Budgets => "Budgets",
            Section::Ai => "AI Insights",
        };
        self.write(&format!("\n== {} ==\n", title));
    }

    fn render_dashboard(&mut self, dashboard: &DashboardView) {
        let mut text = format!(
            "Total spent:  {}\nExpenses:     {}\nBudgets:      {}\n",
            dashboard.total_spent, dashboard.expense_count, dashboard.budget_count
        );
        for mount in [SPENDING_CHART, TREND_CHART] {
            if let Some(chart) = self.chart(mount) {
                text.push_str(&chart);
            }
        }
        self.write(&text);
    }

    fn render_expenses(&mut self, expenses: &ExpensesView) {
        let rows = match expenses {
            ExpensesView::Empty(message) => {
                self.write(&format!("{}\n", message));
                return;
            }
            ExpensesView::Rows(rows) => rows,
        };

        let mut text = format!(
            "{:<6} {:<14} {:<12} {:>10}  {}\n{}\n",
            "ID",
            "Date",
            "Category",
            "Amount",
            "Description",
            "-".repeat(64)
        );
        for row in rows {
            text.push_str(&format!(
                "{:<6} {:<14} {:<12} {:>10}  {}\n",
                row.id, row.date, row.category, row.amount, row.description
            ));
        }
        self.write(&text);
    }

    fn render_budgets(&mut self, budgets: &BudgetsView) {
        let rows = match budgets {
            BudgetsView::Empty(message) => {
                self.write(&format!("{}\n", message));
                return;
            }
            BudgetsView::Rows(rows) => rows,
        };

        let mut text = String::new();
        for progress in rows {
            let filled = (progress.fill / 5.0).round() as usize;
            text.push_str(&format!(
                "{:<14} {}\n  [{}{}] {}{}\n",
                progress.category,
                progress.amount,
                "#".repeat(filled),
                " ".repeat(20 - filled.min(20)),
                progress.caption(),
                if progress.over_budget { "  over budget" } else { "" }
            ));
        }
        if let Some(chart) = self.chart(BUDGET_CHART) {
            text.push_str(&chart);
        }
        self.write(&text);
    }

    fn render_ai(&mut self, panel: &AiPanel) {
        match panel {
            AiPanel::Idle => {}
            AiPanel::Loading(message) => self.write(&format!("{}\n", message)),
            AiPanel::Insight(insight) => {
                let mut text = format!("\nAI Insight\n{}\n", insight.insight);
                if let Some(summary) = &insight.summary {
                    text.push_str(&format!("({})\n", summary));
                }
                if !insight.recommendations.is_empty() {
                    text.push_str("\nRecommendations:\n");
                    for recommendation in &insight.recommendations {
                        text.push_str(&format!("  - {}\n", recommendation));
                    }
                }
                self.write(&text);
            }
        }
    }

    fn render_sample_questions(&mut self, questions: &[String]) {
        let mut text = String::from("Sample questions:\n");
        for (index, question) in questions.iter().enumerate() {
            text.push_str(&format!("  {}. {}\n", index + 1, question));
        }
        self.write(&text);
    }

    fn fill_question(&mut self, question: &str) {
        self.write(&format!("Question: {}\n", question));
    }

    fn reset_form(&mut self, form: FormKind) {
        tracing::trace!(?form, "Form reset");
    }

    fn show_notice(&mut self, notice: &Notice) {
        let mark = match notice.kind {
            NoticeKind::Success => '✓',
            NoticeKind::Error => '✕',
        };
        self.write(&format!("{} {}\n", mark, notice.message));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        match self.confirm {
            ConfirmMode::AssumeYes => true,
            ConfirmMode::AlwaysNo => false,
            ConfirmMode::Stdin => {
                self.write(&format!("{} [y/N] ", prompt));
                let mut answer = String::new();
                match io::stdin().lock().read_line(&mut answer) {
                    Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read confirmation");
                        false
                    }
                }
            }
        }
    }
}

pub const SHELL_HELP: &str = "\
Commands:
  dashboard | expenses | budgets | ai     switch section
  add <amount> <category> [description]   add an expense
  budget <category> <amount> [period]     create a budget
  delete <id>                             delete an expense
  ask <question>                          ask for AI insights
  sample <n>                              use the n-th sample question
  reset                                   restore the demo data
  help                                    show this help
  quit                                    leave the shell

Categories: food, transport, entertainment, shopping, utilities, healthcare, other
Periods: monthly (default), weekly, yearly
";

/// One line of shell input
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Event(Event),
    Help,
    Quit,
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse a line typed into the interactive shell
pub fn parse_shell_line(line: &str) -> Result<ShellCommand, ShellError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(ShellCommand::Empty);
    };
    let args: Vec<&str> = words.collect();

    let event = match command.to_lowercase().as_str() {
        "help" | "?" => return Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => return Ok(ShellCommand::Quit),
        "add" => match args.as_slice() {
            [amount, category, description @ ..] => Event::SubmitExpense(ExpenseForm::new(
                *amount,
                *category,
                description.join(" "),
            )),
            _ => return Err(ShellError::Usage("add <amount> <category> [description]")),
        },
        "budget" => match args.as_slice() {
            [category, amount] => Event::SubmitBudget(BudgetForm::new(*category, *amount, "")),
            [category, amount, period] => {
                Event::SubmitBudget(BudgetForm::new(*category, *amount, *period))
            }
            _ => return Err(ShellError::Usage("budget <category> <amount> [period]")),
        },
        "delete" | "rm" => match args.as_slice() {
            [id] => Event::DeleteExpense(
                id.parse()
                    .map_err(|_| ShellError::Usage("delete <id>"))?,
            ),
            _ => return Err(ShellError::Usage("delete <id>")),
        },
        // Empty questions are left for the controller to reject
        "ask" => Event::AskQuestion(args.join(" ")),
        "sample" => match args.as_slice() {
            [n] => match n.parse::<usize>() {
                Ok(n) if n > 0 => Event::UseSampleQuestion(n - 1),
                _ => return Err(ShellError::Usage("sample <n>")),
            },
            _ => return Err(ShellError::Usage("sample <n>")),
        },
        "reset" => Event::ResetDemoData,
        other => match other.parse::<Section>() {
            Ok(section) => Event::Navigate(section),
            Err(_) => return Err(ShellError::Unknown(command.to_string())),
        },
    };

    Ok(ShellCommand::Event(event))
}
