mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::billing::{
    BillArgs, ElectricityArgs, FeeChangeArgs, MeterArgs, TiersArgs, WaterArgs,
};
use commands::debt::{DebtWarningsArgs, PaymentArgs, RoomDebtArgs};
use commands::words::WordsArgs;

/// Utility billing and rent debt calculations
#[derive(Parser)]
#[command(
    name = "rbe",
    version,
    about = "Utility billing and rent debt calculations",
    long_about = "A CLI for computing monthly room bills (rent, electricity, water, fees) \
                  with decimal precision, and for assessing outstanding rent debt. \
                  Supports meter rollover, flat and tiered electricity, metered and \
                  per-occupant water, Vietnamese amount-in-words, and debt warnings."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a full monthly bill
    Bill(BillArgs),
    /// Add, edit or remove a fee and recompute the bill
    FeeChange(FeeChangeArgs),
    /// Interpret a pair of meter readings (handles rollover)
    MeterUsage(MeterArgs),
    /// Price electricity usage under the configured rates
    ElectricityCost(ElectricityArgs),
    /// Price water under the configured method
    WaterCost(WaterArgs),
    /// Validate and sort a tiered price table
    ValidateTiers(TiersArgs),
    /// Spell an amount in Vietnamese words
    AmountInWords(WordsArgs),
    /// Debt snapshot for one room
    RoomDebt(RoomDebtArgs),
    /// Rooms with two or more consecutive unpaid months
    DebtWarnings(DebtWarningsArgs),
    /// Record a payment against a bill
    RecordPayment(PaymentArgs),
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
    config::init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Bill(args) => commands::billing::run_bill(args),
        Commands::FeeChange(args) => commands::billing::run_fee_change(args),
        Commands::MeterUsage(args) => commands::billing::run_meter_usage(args),
        Commands::ElectricityCost(args) => commands::billing::run_electricity_cost(args),
        Commands::WaterCost(args) => commands::billing::run_water_cost(args),
        Commands::ValidateTiers(args) => commands::billing::run_validate_tiers(args),
        Commands::AmountInWords(args) => commands::words::run_amount_in_words(args),
        Commands::RoomDebt(args) => commands::debt::run_room_debt(args),
        Commands::DebtWarnings(args) => commands::debt::run_debt_warnings(args),
        Commands::RecordPayment(args) => commands::debt::run_record_payment(args),
        Commands::Version => {
            println!("rbe {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
