//! # Ledger Subcommand
//!
//! Income and expense history. Parking income is recorded by `exit`; this
//! command lists the log and appends entries from other sources (store
//! sales, subscriptions, salaries).

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use park_core::{Amount, PaymentMethod};
use park_state::{ParkingSessionCoordinator, Transaction, TransactionCategory, TransactionKind};

use crate::context::{resolve_time, Context};

/// Arguments for `park ledger`.
#[derive(Args, Debug)]
pub struct LedgerArgs {
    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    /// List transactions, newest first, with totals.
    List {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record a transaction.
    Add {
        #[arg(value_enum)]
        kind: KindArg,
        #[arg(value_enum)]
        category: CategoryArg,
        amount: Amount,
        description: String,
        #[arg(long)]
        method: Option<PaymentMethod>,
        /// Transaction date, RFC 3339 (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CategoryArg {
    Parking,
    Subscription,
    ProductSale,
    Salary,
    Other,
}

impl From<CategoryArg> for TransactionCategory {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::Parking => TransactionCategory::Parking,
            CategoryArg::Subscription => TransactionCategory::Subscription,
            CategoryArg::ProductSale => TransactionCategory::ProductSale,
            CategoryArg::Salary => TransactionCategory::Salary,
            CategoryArg::Other => TransactionCategory::Other,
        }
    }
}

pub fn run_ledger(args: &LedgerArgs, ctx: &Context) -> Result<u8> {
    match &args.command {
        LedgerCommand::List { limit } => cmd_list(ctx, *limit),
        LedgerCommand::Add {
            kind,
            category,
            amount,
            description,
            method,
            at,
        } => {
            let date = resolve_time(at.as_deref())?;
            let tx = Transaction::new(
                (*kind).into(),
                (*category).into(),
                *amount,
                description.clone(),
                date,
                *method,
            );
            cmd_add(ctx, tx)
        }
    }
}

fn cmd_list(ctx: &Context, limit: Option<usize>) -> Result<u8> {
    let doc = ctx.load()?;
    let mut income = Amount::ZERO;
    let mut expense = Amount::ZERO;
    for tx in doc.transactions.iter() {
        match tx.kind {
            TransactionKind::Income => income = income.saturating_add(tx.amount),
            TransactionKind::Expense => expense = expense.saturating_add(tx.amount),
        }
    }

    for tx in doc.transactions.iter().take(limit.unwrap_or(usize::MAX)) {
        let sign = match tx.kind {
            TransactionKind::Income => '+',
            TransactionKind::Expense => '-',
        };
        println!(
            "{}  {sign}{:>10}  {:<14} {}{}",
            tx.date,
            tx.amount.to_string(),
            tx.category.as_str(),
            tx.description,
            tx.payment_method
                .map(|m| format!(" ({m})"))
                .unwrap_or_default()
        );
    }
    println!("Income {income}  Expense {expense}");
    Ok(0)
}

fn cmd_add(ctx: &Context, tx: Transaction) -> Result<u8> {
    let mut doc = ctx.load()?;
    let transition = ParkingSessionCoordinator::new().record(&doc.lot_state(), tx);
    doc.commit(transition.state);
    ctx.save(&doc)?;
    println!("OK: recorded transaction {}", transition.outcome);
    Ok(0)
}
