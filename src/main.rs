//! Budget Buddy CLI
//!
//! Terminal front end for the budgeting backend:
//! - Dashboard, expense and budget listings
//! - Add and delete expenses, create budgets
//! - Ask the AI assistant
//! - Interactive shell
//!
//! # Configuration
//!
//! Settings come from `--config`, else `~/.config/budget-buddy/config.toml` or
//! `./config.toml`. Environment variables override the file:
//! - `BUDGET_BUDDY_API_URL`: Backend base URL (default: http://localhost:8000)
//! - `BUDGET_BUDDY_TIMEOUT_SECS`: Per-request timeout (default: 30)
//! - `BUDGET_BUDDY_LOG_LEVEL`: Log level (default: info)
//! - `BUDGET_BUDDY_LOG_FORMAT`: `pretty` or `json`
//! - `RUST_LOG`: Full filter directive, wins over the log level

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use budget_buddy::api::{ApiClient, BudgetApi};
use budget_buddy::app::{BudgetForm, Controller, ExpenseForm, Notices, Section, CATEGORIES};
use budget_buddy::charts::{
    ChartManager, TextChartBackend, TextSurface, BUDGET_CHART, SPENDING_CHART, TREND_CHART,
};
use budget_buddy::config::{self, Config, LoggingConfig};
use budget_buddy::terminal::{parse_shell_line, ConfirmMode, ShellCommand, TerminalView, SHELL_HELP};
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type TerminalController = Controller<ApiClient, TerminalView<io::Stdout>, TextChartBackend>;

#[derive(Parser)]
#[command(name = "budget-buddy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track expenses and budgets, and ask an AI about your spending")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show totals and spending charts
    Dashboard,

    /// List, add or delete expenses
    Expenses {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// List or create budgets
    Budgets {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Ask the AI assistant a question about your spending
    Ask {
        /// The question (words are joined with spaces)
        question: Vec<String>,
    },

    /// List suggested AI questions
    Questions,

    /// Check that the backend is up
    Health,

    /// Check the backend and report how much data it holds
    Verify,

    /// Restore the backend's demo data
    Reset,

    /// Interactive shell
    Shell,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    List,

    Add {
        /// Amount, e.g. 12.50
        amount: String,
        #[arg(value_parser = PossibleValuesParser::new(CATEGORIES))]
        category: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    List,

    Add {
        #[arg(value_parser = PossibleValuesParser::new(CATEGORIES))]
        category: String,
        /// Amount, e.g. 400
        amount: String,
        #[arg(short, long, default_value = "monthly")]
        period: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = config::generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    init_logging(&config.logging);
    tracing::debug!(
        "Budget Buddy v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let api = ApiClient::from_config(&config.api).context("Failed to build HTTP client")?;

    let ok = match cli.command {
        Commands::Health => health(&api).await,
        Commands::Verify => verify(&api).await,
        Commands::Questions => questions(&api).await,
        command => run_controller(command, api, &config).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("budget_buddy={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    // Views go to stdout, logs to stderr
    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

fn controller(api: ApiClient, config: &Config, confirm: ConfirmMode) -> TerminalController {
    let surface = TextSurface::with_mounts(&[SPENDING_CHART, BUDGET_CHART, TREND_CHART]);
    let charts = ChartManager::new(TextChartBackend::new(surface.clone()));
    let view = TerminalView::new(io::stdout(), surface, confirm);
    Controller::new(api, view, charts, Notices::from_config(&config.ui))
}

/// Run a controller-backed command. Returns false when it ended on an error.
async fn run_controller(command: Commands, api: ApiClient, config: &Config) -> anyhow::Result<bool> {
    let confirm = match &command {
        Commands::Expenses {
            action: ExpenseAction::Delete { yes: true, .. },
        } => ConfirmMode::AssumeYes,
        _ => ConfirmMode::Stdin,
    };
    let mut controller = controller(api, config, confirm);

    match command {
        Commands::Dashboard => controller.initialize().await,
        Commands::Shell => return shell(&mut controller).await,
        Commands::Reset => controller.reset_demo_data().await,
        command => {
            if !controller.load_initial_data().await {
                return Ok(false);
            }
            match command {
                Commands::Expenses { action } => {
                    controller.show_section(Section::Expenses).await;
                    match action {
                        ExpenseAction::List => {}
                        ExpenseAction::Add {
                            amount,
                            category,
                            description,
                        } => {
                            let form = ExpenseForm::new(amount, category, description);
                            controller.submit_expense(&form).await;
                        }
                        ExpenseAction::Delete { id, .. } => controller.delete_expense(id).await,
                    }
                }
                Commands::Budgets { action } => {
                    controller.show_section(Section::Budgets).await;
                    if let BudgetAction::Add {
                        category,
                        amount,
                        period,
                    } = action
                    {
                        let form = BudgetForm::new(category, amount, period);
                        controller.submit_budget(&form).await;
                    }
                }
                Commands::Ask { question } => {
                    controller.submit_ai_question(&question.join(" ")).await;
                }
                _ => {}
            }
        }
    }

    Ok(!controller.has_failed())
}

async fn shell(controller: &mut TerminalController) -> anyhow::Result<bool> {
    controller.initialize().await;
    println!("\n{}", SHELL_HELP);

    loop {
        print!("budget> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match parse_shell_line(&line) {
            Ok(ShellCommand::Event(event)) => controller.dispatch(event).await,
            Ok(ShellCommand::Help) => println!("{}", SHELL_HELP),
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::Empty) => {}
            Err(e) => eprintln!("{}", e),
        }
    }

    Ok(true)
}

async fn health(api: &ApiClient) -> bool {
    match api.health_check().await {
        Ok(status) => {
            match status.timestamp {
                Some(timestamp) => println!("Backend is {} ({})", status.status, timestamp),
                None => println!("Backend is {}", status.status),
            }
            true
        }
        Err(e) => {
            eprintln!("Cannot reach Budget Buddy backend at {}", api.base_url());
            eprintln!("Error: {}", e);
            false
        }
    }
}

async fn verify(api: &ApiClient) -> bool {
    println!("Budget Buddy setup verification");
    println!("{}", "=".repeat(40));

    if !health(api).await {
        return false;
    }

    let mut ok = true;
    match api.get_expenses().await {
        Ok(expenses) => println!("Expenses loaded: {}", expenses.len()),
        Err(e) => {
            eprintln!("Failed to fetch expenses: {}", e);
            ok = false;
        }
    }
    match api.get_budgets().await {
        Ok(budgets) => println!("Budgets loaded:  {}", budgets.len()),
        Err(e) => {
            eprintln!("Failed to fetch budgets: {}", e);
            ok = false;
        }
    }
    match api.get_sample_questions().await {
        Ok(questions) => println!("Sample questions available: {}", questions.len()),
        Err(e) => {
            eprintln!("Failed to fetch sample questions: {}", e);
            ok = false;
        }
    }

    println!();
    if ok {
        println!("All checks passed");
    } else {
        println!("Some checks failed. Try `budget-buddy reset` to restore the demo data.");
    }
    ok
}

async fn questions(api: &ApiClient) -> bool {
    match api.get_sample_questions().await {
        Ok(questions) if questions.is_empty() => {
            println!("No sample questions available.");
            true
        }
        Ok(questions) => {
            for (index, question) in questions.iter().enumerate() {
                println!("{:>2}. {}", index + 1, question);
            }
            true
        }
        Err(e) => {
            eprintln!("Failed to fetch sample questions: {}", e);
            false
        }
    }
}
