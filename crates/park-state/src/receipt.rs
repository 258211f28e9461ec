//! Receipt data for entry and exit. Presentation is up to the caller;
//! [`EntryReceipt::render`] and [`ExitReceipt::render`] give a plain-text
//! form for narrow receipt printers.

use std::fmt::Write as _;

use serde::Serialize;

use park_core::{Amount, PaymentMethod, SpotId, TicketId, Timestamp, TransactionId, VehicleCategory};

/// What an entry ticket shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReceipt {
    pub ticket_id: TicketId,
    pub plate: String,
    pub category: VehicleCategory,
    pub spot_id: SpotId,
    pub spot_label: String,
    pub entry_time: Timestamp,
}

/// What an exit receipt shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitReceipt {
    pub ticket_id: TicketId,
    pub plate: String,
    pub category: VehicleCategory,
    pub spot_id: SpotId,
    pub spot_label: String,
    pub entry_time: Timestamp,
    pub exit_time: Timestamp,
    pub elapsed_minutes: u64,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub transaction_id: TransactionId,
}

impl EntryReceipt {
    pub fn render(&self, company_name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{company_name}");
        let _ = writeln!(out, "ENTRY TICKET");
        let _ = writeln!(out, "Ticket:   {}", self.ticket_id);
        let _ = writeln!(out, "Plate:    {}", self.plate);
        let _ = writeln!(out, "Vehicle:  {}", self.category);
        let _ = writeln!(out, "Spot:     {}", self.spot_label);
        let _ = writeln!(out, "Entry:    {}", self.entry_time);
        out
    }
}

impl ExitReceipt {
    pub fn render(&self, company_name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{company_name}");
        let _ = writeln!(out, "EXIT RECEIPT");
        let _ = writeln!(out, "Ticket:   {}", self.ticket_id);
        let _ = writeln!(out, "Plate:    {}", self.plate);
        let _ = writeln!(out, "Vehicle:  {}", self.category);
        let _ = writeln!(out, "Spot:     {}", self.spot_label);
        let _ = writeln!(out, "Entry:    {}", self.entry_time);
        let _ = writeln!(out, "Exit:     {}", self.exit_time);
        let _ = writeln!(
            out,
            "Duration: {}h {}m",
            self.elapsed_minutes / 60,
            self.elapsed_minutes % 60
        );
        let _ = writeln!(out, "Paid:     {} ({})", self.amount, self.payment_method);
        out
    }
}
