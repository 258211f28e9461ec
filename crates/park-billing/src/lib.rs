//! # park-billing — Pricing Policies
//!
//! Pure functions over explicit inputs. Nothing in this crate reads the
//! clock or holds mutable state.
//!
//! - **Rates** (`rates.rs`): `RateConfig` per vehicle category, collected
//!   in a `RateTable`.
//! - **Fee** (`fee.rs`): the tiered hourly policy. A flat first hour,
//!   ceil-rounded additional-hour blocks, and an all-or-nothing tolerance
//!   window.
//! - **Lateness** (`lateness.rs`): whether a monthly subscriber is behind
//!   on payment.

pub mod fee;
pub mod lateness;
pub mod rates;

pub use fee::{
    compute_fee, elapsed_minutes, fee_breakdown, fee_for_minutes, minimum_fee, parse_override,
    validate_override, BillingError, FeeBreakdown,
};
pub use lateness::{Customer, LatenessPolicy};
pub use rates::{RateConfig, RateTable};
