use anyhow::Result;
use clap::{Parser, Subcommand};

use fintrack::cli::{
    handle_budget_command, handle_category_command, handle_entry_command, handle_goal_command,
    handle_receipt_command, RangeArgs,
};
use fintrack::config::{paths::FinancePaths, settings::Settings};
use fintrack::reports::PeriodSummary;
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracker",
    long_about = "fintrack keeps recurring and one-time incomes and expenses, \
                  projects them onto any date window, tracks category budgets \
                  and savings goals, and reads totals off receipt scans."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize settings and default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand)]
    Category(fintrack::cli::CategoryCommands),

    /// Income and expense commands
    #[command(subcommand)]
    Entry(fintrack::cli::EntryCommands),

    /// Category budget commands
    #[command(subcommand)]
    Budget(fintrack::cli::BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(fintrack::cli::GoalCommands),

    /// Receipt extraction commands
    #[command(subcommand)]
    Receipt(fintrack::cli::ReceiptCommands),

    /// Income, expenses and spending by category for a window
    Summary {
        #[command(flatten)]
        range: RangeArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show recent audit log entries
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    fintrack::logging::init_tracing();
    let cli = Cli::parse();

    let paths = FinancePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            if fintrack::storage::init::initialize_storage(&paths)? {
                let state = storage.load()?;
                println!("Initialization complete!");
                println!();
                println!("Default categories have been created:");
                for category in &state.categories {
                    println!("  - {}", category.name);
                }
                println!();
                println!("Run 'fintrack category list' to see all categories.");
            } else {
                println!("Already initialized; nothing to do.");
            }
        }
        Some(Commands::Config) => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Records file:    {}", paths.finance_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Default currency: {}", settings.default_currency);
            println!("  Date format:      {}", settings.date_format);
            println!("  Week starts on:   {}", settings.week_starts_on);
            println!("  OCR command:      {}", settings.ocr_command);
            println!(
                "  Custom keywords:  {}",
                if settings.categorization_keywords.is_some() { "yes" } else { "no" }
            );
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Entry(cmd)) => {
            handle_entry_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            handle_goal_command(&storage, cmd)?;
        }
        Some(Commands::Receipt(cmd)) => {
            handle_receipt_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Summary { range, json }) => {
            let range = range.resolve(&settings)?;
            let summary = PeriodSummary::generate(&storage.load()?, range);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.format_terminal());
            }
        }
        Some(Commands::History { count }) => {
            let entries = storage.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No history yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("fintrack - personal finance tracking");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            println!("Run 'fintrack init' to get started.");
        }
    }

    Ok(())
}
