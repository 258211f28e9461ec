//! # Backup Subcommand
//!
//! - `export` — write the document as pretty JSON to a file or stdout.
//! - `restore` — validate a backup file and replace the stored document.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use park_store::{export_backup, restore_backup};

use crate::context::Context;

/// Arguments for `park backup`.
#[derive(Args, Debug)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Export the lot document.
    Export {
        /// Output file (stdout if omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace the lot document with a backup.
    Restore {
        file: PathBuf,
    },
}

pub fn run_backup(args: &BackupArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        BackupCommand::Export { output } => {
            let doc = ctx.load()?;
            let text = export_backup(&doc)?;
            match output {
                Some(path) => {
                    std::fs::write(path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("OK: backup written to {}", path.display());
                }
                None => println!("{text}"),
            }
            Ok(0)
        }
        BackupCommand::Restore { file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let doc = restore_backup(&text)
                .with_context(|| format!("restoring {}", file.display()))?;
            ctx.save(&doc)?;
            println!(
                "OK: restored {} spots, {} tickets, {} transactions",
                doc.spots.len(),
                doc.tickets.len(),
                doc.transactions.len()
            );
            Ok(0)
        }
    }
}
