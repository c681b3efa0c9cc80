mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::book::BookArgs;
use commands::fees::{FeesArgs, TdsArgs};
use commands::onboarding::OnboardingArgs;
use commands::performance::{CagrArgs, IrrArgs, RatiosArgs};

/// Portfolio-management fee, tax, and performance analytics
#[derive(Parser)]
#[command(
    name = "pms",
    version,
    about = "Portfolio-management fee, tax, and performance analytics",
    long_about = "A CLI for portfolio-management reporting calculations with decimal \
                  precision. Supports tiered management and performance fees, GST, \
                  TDS withholding, risk-adjusted ratios, CAGR, IRR, onboarding \
                  validation, and synthetic book generation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the full fee statement (management + performance + GST)
    Fees(FeesArgs),
    /// Calculate TDS withholding across the income heads
    Tds(TdsArgs),
    /// Calculate risk-adjusted ratios (Sharpe, Treynor, Jensen)
    Ratios(RatiosArgs),
    /// Calculate compound annual growth rate
    Cagr(CagrArgs),
    /// Calculate holding-period IRR, or XIRR from dated flows
    Irr(IrrArgs),
    /// Validate an onboarding application
    Onboarding(OnboardingArgs),
    /// Generate a synthetic client book
    Book(BookArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Fees(args) => commands::fees::run_fees(args),
        Commands::Tds(args) => commands::fees::run_tds(args),
        Commands::Ratios(args) => commands::performance::run_ratios(args),
        Commands::Cagr(args) => commands::performance::run_cagr(args),
        Commands::Irr(args) => commands::performance::run_irr(args),
        Commands::Onboarding(args) => commands::onboarding::run_onboarding(args),
        Commands::Book(args) => commands::book::run_book(args),
        Commands::Version => {
            println!("pms {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
