//! # park CLI entry point
//!
//! Parses command-line arguments, loads configuration, installs the
//! tracing subscriber, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use park_cli::admin::{run_init, run_verify, InitArgs};
use park_cli::backup::{run_backup, BackupArgs};
use park_cli::config::ParkConfig;
use park_cli::context::Context;
use park_cli::customers::{run_customers, CustomersArgs};
use park_cli::ledger::{run_ledger, LedgerArgs};
use park_cli::rates::{run_rates, RatesArgs};
use park_cli::session::{
    run_cancel, run_entry, run_exit, run_quote, run_tickets, CancelArgs, EntryArgs, ExitArgs,
    QuoteArgs, TicketsArgs,
};
use park_cli::spots::{run_spots, SpotsArgs};

/// Parking lot occupancy and billing.
///
/// Tracks spots and tickets, computes fees from per-category rates,
/// records income, and prints entry and exit receipts.
#[derive(Parser, Debug)]
#[command(name = "park", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Lot document path (overrides configuration).
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a fresh lot document.
    Init(InitArgs),

    /// List, search, and resize spots.
    Spots(SpotsArgs),

    /// Register a vehicle entering a spot.
    Entry(EntryArgs),

    /// Show the fee a parked vehicle would pay now.
    Quote(QuoteArgs),

    /// Charge and release a parked vehicle.
    Exit(ExitArgs),

    /// Release a spot without charge.
    Cancel(CancelArgs),

    /// Ticket history.
    Tickets(TicketsArgs),

    /// Show or change the tariff.
    Rates(RatesArgs),

    /// Income and expense log.
    Ledger(LedgerArgs),

    /// Monthly subscribers.
    Customers(CustomersArgs),

    /// Export or restore a backup.
    Backup(BackupArgs),

    /// Check the stored document for broken invariants.
    Verify,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = match ParkConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    tracing::debug!(state_path = %config.state_path.display(), "configuration loaded");

    let ctx = Context::new(config);
    let result = match &cli.command {
        Commands::Init(args) => run_init(args, &ctx),
        Commands::Spots(args) => run_spots(args, &ctx),
        Commands::Entry(args) => run_entry(args, &ctx),
        Commands::Quote(args) => run_quote(args, &ctx),
        Commands::Exit(args) => run_exit(args, &ctx),
        Commands::Cancel(args) => run_cancel(args, &ctx),
        Commands::Tickets(args) => run_tickets(args, &ctx),
        Commands::Rates(args) => run_rates(args, &ctx),
        Commands::Ledger(args) => run_ledger(args, &ctx),
        Commands::Customers(args) => run_customers(args, &ctx),
        Commands::Backup(args) => run_backup(args, &ctx),
        Commands::Verify => run_verify(&ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
