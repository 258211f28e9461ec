//! # Session Subcommands
//!
//! The front-desk flow: `entry`, `quote`, `exit`, `cancel`, and the
//! `tickets` history. Each mutating command loads the document, runs one
//! coordinator operation, and saves only if it committed.

use anyhow::{Context as _, Result};
use clap::Args;

use park_core::{Amount, PaymentMethod, SpotId, VehicleCategory};
use park_state::{EntryRequest, ExitRequest, ParkingSessionCoordinator, Ticket};

use crate::context::{resolve_time, Context};

/// Arguments for `park entry`.
#[derive(Args, Debug)]
pub struct EntryArgs {
    /// Spot id.
    pub spot: u32,
    /// Licence plate.
    pub plate: String,
    /// Vehicle category (defaults to the spot's category).
    #[arg(long)]
    pub category: Option<VehicleCategory>,
    /// Vehicle model.
    #[arg(long)]
    pub model: Option<String>,
    /// Entry time, RFC 3339 (defaults to now).
    #[arg(long)]
    pub at: Option<String>,
    /// Print the receipt as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `park quote`.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Spot id.
    pub spot: u32,
    /// Provisional exit time, RFC 3339 (defaults to now).
    #[arg(long)]
    pub at: Option<String>,
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `park exit`.
#[derive(Args, Debug)]
pub struct ExitArgs {
    /// Spot id.
    pub spot: u32,
    /// Payment method: cash, credit, debit, pix.
    #[arg(long, default_value = "cash")]
    pub method: PaymentMethod,
    /// Charge this amount instead of the computed fee.
    #[arg(long, conflicts_with = "min_fee")]
    pub amount: Option<Amount>,
    /// Charge the first-hour price instead of the computed fee.
    #[arg(long)]
    pub min_fee: bool,
    /// Exit time, RFC 3339 (defaults to now).
    #[arg(long)]
    pub at: Option<String>,
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `park cancel`.
#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Spot id.
    pub spot: u32,
}

/// Arguments for `park tickets`.
#[derive(Args, Debug)]
pub struct TicketsArgs {
    /// Only tickets still parked.
    #[arg(long)]
    pub active: bool,
    /// Show at most this many, newest first.
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run_entry(args: &EntryArgs, ctx: &Context) -> Result<u8> {
    let mut doc = ctx.load()?;
    let at = resolve_time(args.at.as_deref())?;
    let transition = ParkingSessionCoordinator::new()
        .enter(
            &doc.lot_state(),
            EntryRequest {
                spot_id: SpotId(args.spot),
                plate: args.plate.clone(),
                category: args.category,
                model: args.model.clone(),
                at,
            },
        )
        .with_context(|| format!("entry at spot {}", args.spot))?;
    doc.commit(transition.state);
    ctx.save(&doc)?;

    let receipt = transition.outcome;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        print!("{}", receipt.render(&doc.settings.company_name));
    }
    Ok(0)
}

pub fn run_quote(args: &QuoteArgs, ctx: &Context) -> Result<u8> {
    let doc = ctx.load()?;
    let now = resolve_time(args.at.as_deref())?;
    let quote = ParkingSessionCoordinator::new()
        .quote(&doc.lot_state(), SpotId(args.spot), now)
        .with_context(|| format!("quote for spot {}", args.spot))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(0);
    }
    println!("Spot:      {} ({})", quote.spot_label, quote.category);
    println!("Plate:     {}", quote.plate);
    println!("Entry:     {}", quote.entry_time);
    println!("Elapsed:   {} min", quote.breakdown.minutes);
    if quote.breakdown.within_tolerance {
        println!("Fee:       {} (within tolerance)", quote.suggested);
    } else {
        println!(
            "Fee:       {} = {} + {} x additional hour",
            quote.suggested, quote.breakdown.base, quote.breakdown.additional_blocks
        );
    }
    println!("Minimum:   {}", quote.minimum);
    Ok(0)
}

pub fn run_exit(args: &ExitArgs, ctx: &Context) -> Result<u8> {
    let mut doc = ctx.load()?;
    let exit_time = resolve_time(args.at.as_deref())?;
    let coordinator = ParkingSessionCoordinator::new();
    let state = doc.lot_state();
    let spot_id = SpotId(args.spot);

    // An explicit amount needs no tariff.
    let amount = match args.amount {
        Some(amount) => {
            tracing::info!(charged = %amount, "fee overridden");
            amount
        }
        None => {
            let quote = coordinator
                .quote(&state, spot_id, exit_time)
                .with_context(|| format!("exit from spot {}", args.spot))?;
            if args.min_fee {
                tracing::info!(suggested = %quote.suggested, charged = %quote.minimum, "fee overridden");
                quote.minimum
            } else {
                quote.suggested
            }
        }
    };

    let transition = coordinator
        .exit(
            &state,
            ExitRequest {
                spot_id,
                exit_time,
                amount,
                payment_method: args.method,
            },
        )
        .with_context(|| format!("exit from spot {}", args.spot))?;
    doc.commit(transition.state);
    ctx.save(&doc)?;

    let receipt = transition.outcome;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        print!("{}", receipt.render(&doc.settings.company_name));
    }
    Ok(0)
}

pub fn run_cancel(args: &CancelArgs, ctx: &Context) -> Result<u8> {
    let mut doc = ctx.load()?;
    let transition = ParkingSessionCoordinator::new()
        .cancel(&doc.lot_state(), SpotId(args.spot))
        .with_context(|| format!("cancel at spot {}", args.spot))?;
    doc.commit(transition.state);
    ctx.save(&doc)?;

    let ticket = transition.outcome;
    println!(
        "OK: ticket {} ({}) cancelled, spot {} is free",
        ticket.id(),
        ticket.plate(),
        args.spot
    );
    Ok(0)
}

pub fn run_tickets(args: &TicketsArgs, ctx: &Context) -> Result<u8> {
    let doc = ctx.load()?;
    let tickets: Vec<&Ticket> = doc
        .tickets
        .iter()
        .rev()
        .filter(|t| !args.active || t.is_active())
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if tickets.is_empty() {
        println!("No tickets.");
        return Ok(0);
    }
    for t in tickets {
        let spot = t.spot_id().map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        let settled = match (t.exit_time(), t.total_amount()) {
            (Some(exit), Some(amount)) => format!(
                " exit {exit} paid {amount}{}",
                t.payment_method()
                    .map(|m| format!(" ({m})"))
                    .unwrap_or_default()
            ),
            _ => String::new(),
        };
        println!(
            "{:<9} {:<10} {:<5} spot {:<4} entry {}{}  [{}]",
            t.status().name(),
            t.plate(),
            t.category().as_str(),
            spot,
            t.entry_time(),
            settled,
            t.id()
        );
    }
    Ok(0)
}
