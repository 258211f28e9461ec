//! # Vehicle Categories and Payment Methods
//!
//! Closed enums shared by spots, tickets, rates, and the ledger. Wire
//! names are the upper-case tags of the stored document (`"CAR"`,
//! `"CREDIT_CARD"`, ...).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParkError;

/// The kind of vehicle a spot is sized for and a rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleCategory {
    Car,
    Moto,
    Van,
    Truck,
}

impl VehicleCategory {
    /// Every category, in wire order.
    pub const ALL: [VehicleCategory; 4] = [Self::Car, Self::Moto, Self::Van, Self::Truck];

    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Moto => "MOTO",
            Self::Van => "VAN",
            Self::Truck => "TRUCK",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = ParkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAR" => Ok(Self::Car),
            "MOTO" => Ok(Self::Moto),
            "VAN" => Ok(Self::Van),
            "TRUCK" => Ok(Self::Truck),
            other => Err(ParkError::Validation(format!(
                "unknown vehicle category: {other:?}"
            ))),
        }
    }
}

/// How a charge was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    /// Instant bank transfer.
    Pix,
}

impl PaymentMethod {
    /// The canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
            Self::Pix => "PIX",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "CASH" => Ok(Self::Cash),
            "CREDIT_CARD" | "CREDIT" => Ok(Self::CreditCard),
            "DEBIT_CARD" | "DEBIT" => Ok(Self::DebitCard),
            "PIX" => Ok(Self::Pix),
            other => Err(ParkError::Validation(format!(
                "unknown payment method: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        for c in VehicleCategory::ALL {
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }

    #[test]
    fn test_category_from_str_case_insensitive() {
        assert_eq!("moto".parse::<VehicleCategory>().unwrap(), VehicleCategory::Moto);
        assert!("BUS".parse::<VehicleCategory>().is_err());
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
        let pm: PaymentMethod = serde_json::from_str("\"DEBIT_CARD\"").unwrap();
        assert_eq!(pm, PaymentMethod::DebitCard);
    }

    #[test]
    fn test_payment_method_from_str() {
        assert_eq!("credit-card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert_eq!("pix".parse::<PaymentMethod>().unwrap(), PaymentMethod::Pix);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
