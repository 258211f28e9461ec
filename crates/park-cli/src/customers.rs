//! # Customers Subcommand
//!
//! Read-only view of monthly subscribers. Subscriber records are managed
//! elsewhere; this command only evaluates lateness.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use crate::context::{resolve_time, Context};

/// Arguments for `park customers`.
#[derive(Args, Debug)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Subcommand, Debug)]
pub enum CustomersCommand {
    /// Active subscribers behind on payment.
    Late {
        /// Evaluation time, RFC 3339 (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },
}

pub fn run_customers(args: &CustomersArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        CustomersCommand::Late { at } => {
            let now = resolve_time(at.as_deref())?;
            let policy = ctx.config.lateness_policy()?;
            let doc = ctx.load()?;
            let customers = doc.customers().context("reading subscriber records")?;
            let late = policy.late_customers(&customers, now);

            if late.is_empty() {
                println!("No late subscribers.");
                return Ok(0);
            }
            for c in &late {
                let since = match policy.days_since_payment(c, now) {
                    Some(days) => format!("last paid {days} days ago"),
                    None => "never paid".to_string(),
                };
                println!(
                    "{:<10} {:<24} fee {:>8}  due day {:>2}  {since}",
                    c.plate,
                    c.name,
                    c.monthly_fee.to_string(),
                    c.due_day_of_month
                );
            }
            println!("{} late of {} subscribers", late.len(), customers.len());
            Ok(0)
        }
    }
}
