//! # Spots Subcommand
//!
//! - `list` — every spot with its occupant.
//! - `search` — match by label, plate, or ticket id.
//! - `resize` — grow or shrink the lot.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use park_core::VehicleCategory;
use park_state::{LotState, ParkingSessionCoordinator, ParkingSpot};

use crate::context::Context;

/// Arguments for `park spots`.
#[derive(Args, Debug)]
pub struct SpotsArgs {
    #[command(subcommand)]
    pub command: SpotsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SpotsCommand {
    /// List spots.
    List {
        /// Only free spots.
        #[arg(long)]
        free: bool,
    },

    /// Find spots by label, plate, or ticket id.
    Search {
        term: String,
    },

    /// Change the number of spots. Occupied spots are never removed.
    Resize {
        count: usize,
        /// Category of added spots (defaults to the configured category).
        #[arg(long)]
        category: Option<VehicleCategory>,
    },
}

pub fn run_spots(args: &SpotsArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        SpotsCommand::List { free } => cmd_list(ctx, *free),
        SpotsCommand::Search { term } => cmd_search(ctx, term),
        SpotsCommand::Resize { count, category } => {
            cmd_resize(ctx, *count, category.unwrap_or(ctx.config.default_category))
        }
    }
}

fn cmd_list(ctx: &Context, free_only: bool) -> Result<u8> {
    let state = ctx.load()?.lot_state();
    let spots: Vec<&ParkingSpot> = state
        .spots
        .iter()
        .filter(|s| !free_only || !s.is_occupied())
        .collect();
    for spot in &spots {
        print_spot(&state, spot);
    }
    println!(
        "{} spots, {} occupied",
        state.spots.len(),
        state.spots.occupied_count()
    );
    Ok(0)
}

fn cmd_search(ctx: &Context, term: &str) -> Result<u8> {
    let state = ctx.load()?.lot_state();
    let found = state.search(term);
    if found.is_empty() {
        println!("No spots match {term:?}.");
        return Ok(1);
    }
    for spot in found {
        print_spot(&state, spot);
    }
    Ok(0)
}

fn cmd_resize(ctx: &Context, count: usize, category: VehicleCategory) -> Result<u8> {
    let mut doc = ctx.load()?;
    let transition = ParkingSessionCoordinator::new()
        .resize(&doc.lot_state(), count, category)
        .with_context(|| format!("resize to {count} spots"))?;
    doc.commit(transition.state);
    ctx.save(&doc)?;

    let outcome = transition.outcome;
    println!(
        "OK: {} spots ({} added, {} removed)",
        doc.spots.len(),
        outcome.added.len(),
        outcome.removed.len()
    );
    Ok(0)
}

fn print_spot(state: &LotState, spot: &ParkingSpot) {
    let occupant = spot
        .current_ticket()
        .and_then(|id| state.tickets.get(id))
        .map(|t| format!("{} since {}", t.plate(), t.entry_time()))
        .unwrap_or_else(|| "free".to_string());
    println!(
        "{:>4}  {:<6} {:<5} {}",
        spot.id().get(),
        spot.label(),
        spot.category().as_str(),
        occupant
    );
}
