//! # Rates Subcommand
//!
//! Show and change the per-category tariff.

use anyhow::Result;
use clap::{Args, Subcommand};

use park_billing::RateConfig;
use park_core::{UnitPrice, VehicleCategory};
use park_state::ParkingSessionCoordinator;

use crate::context::Context;

/// Arguments for `park rates`.
#[derive(Args, Debug)]
pub struct RatesArgs {
    #[command(subcommand)]
    pub command: RatesCommand,
}

#[derive(Subcommand, Debug)]
pub enum RatesCommand {
    /// Print the tariff.
    Show,

    /// Replace the tariff of one category.
    Set {
        category: VehicleCategory,
        /// Flat charge for the first hour.
        #[arg(long)]
        first_hour: UnitPrice,
        /// Charge per started hour after the first.
        #[arg(long)]
        additional_hour: UnitPrice,
        /// Stays up to this many minutes are free (0 disables).
        #[arg(long, default_value_t = 0)]
        tolerance: u32,
    },
}

pub fn run_rates(args: &RatesArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        RatesCommand::Show => cmd_show(ctx),
        RatesCommand::Set {
            category,
            first_hour,
            additional_hour,
            tolerance,
        } => cmd_set(
            ctx,
            *category,
            RateConfig::new(*first_hour, *additional_hour, *tolerance),
        ),
    }
}

fn cmd_show(ctx: &Context) -> Result<u8> {
    let doc = ctx.load()?;
    println!("{:<6} {:>10} {:>10} {:>9}", "TYPE", "1ST HOUR", "ADD'L", "TOLERANCE");
    for (category, rate) in doc.settings.rates.iter() {
        println!(
            "{:<6} {:>10} {:>10} {:>5} min",
            category.as_str(),
            rate.first_hour_price.to_string(),
            rate.additional_hour_price.to_string(),
            rate.tolerance_minutes
        );
    }
    for category in VehicleCategory::ALL {
        if doc.settings.rates.get(category).is_none() {
            tracing::warn!(%category, "no rate configured");
        }
    }
    Ok(0)
}

fn cmd_set(ctx: &Context, category: VehicleCategory, rate: RateConfig) -> Result<u8> {
    let mut doc = ctx.load()?;
    let transition = ParkingSessionCoordinator::new().set_rate(&doc.lot_state(), category, rate);
    doc.commit(transition.state);
    ctx.save(&doc)?;
    println!(
        "OK: {category} first hour {}, additional hour {}, tolerance {} min",
        rate.first_hour_price, rate.additional_hour_price, rate.tolerance_minutes
    );
    Ok(0)
}
