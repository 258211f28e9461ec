//! # Admin Subcommands
//!
//! `init` creates a fresh lot document; `verify` checks the stored one.

use anyhow::{bail, Result};
use clap::Args;

use park_store::FreshLayout;

use crate::context::Context;

/// Arguments for `park init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Number of spots (defaults to the configured count).
    #[arg(long)]
    pub spots: Option<usize>,
    /// How many of the first spots are MOTO.
    #[arg(long)]
    pub moto: Option<usize>,
    /// Overwrite an existing document.
    #[arg(long)]
    pub force: bool,
}

pub fn run_init(args: &InitArgs, ctx: &Context) -> Result<u8> {
    let path = ctx.store().path();
    if ctx.store().exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let defaults = ctx.config.fresh_layout();
    let layout = FreshLayout {
        spot_count: args.spots.unwrap_or(defaults.spot_count),
        moto_count: args.moto.unwrap_or(defaults.moto_count),
        ..defaults
    };
    if layout.spot_count == 0 {
        bail!("a lot needs at least one spot");
    }
    if layout.moto_count > layout.spot_count {
        bail!(
            "--moto ({}) exceeds --spots ({})",
            layout.moto_count,
            layout.spot_count
        );
    }

    let doc = layout.build();
    ctx.save(&doc)?;
    tracing::info!(path = %path.display(), spots = layout.spot_count, "lot initialised");
    println!(
        "OK: {} with {} spots ({} MOTO)",
        path.display(),
        layout.spot_count,
        layout.moto_count
    );
    Ok(0)
}

/// Exit code 2 when the document breaks an invariant.
pub fn run_verify(ctx: &Context) -> Result<u8> {
    let doc = ctx.load()?;
    match doc.lot_state().verify() {
        Ok(()) => {
            println!(
                "OK: {} spots, {} tickets, {} transactions consistent",
                doc.spots.len(),
                doc.tickets.len(),
                doc.transactions.len()
            );
            Ok(0)
        }
        Err(violations) => {
            for v in &violations {
                println!("VIOLATION: {v}");
            }
            println!("{} violation(s)", violations.len());
            Ok(2)
        }
    }
}
