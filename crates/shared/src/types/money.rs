//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g. francs, euros).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

/// ISO 4217 currency codes a ledger may be kept in.
///
/// The CFA francs are the ledger currencies of the OHADA zone; EUR and USD
/// are carried for companies that keep their books in a foreign currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// West African CFA franc (UEMOA).
    #[default]
    Xof,
    /// Central African CFA franc (CEMAC).
    Xaf,
    /// Euro
    Eur,
    /// US Dollar
    Usd,
}

impl Currency {
    /// Number of decimal places used when rounding amounts in this currency.
    ///
    /// CFA francs have no minor unit.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Xof | Self::Xaf => 0,
            Self::Eur | Self::Usd => 2,
        }
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds the amount to the currency's minor units (banker's rounding).
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.minor_units()),
            currency: self.currency,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xof => write!(f, "XOF"),
            Self::Xaf => write!(f, "XAF"),
            Self::Eur => write!(f, "EUR"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "XOF" => Ok(Self::Xof),
            "XAF" => Ok(Self::Xaf),
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let amount = dec!(1180);
        let money = Money::new(amount, Currency::Xof);
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, Currency::Xof);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Xaf);
        assert!(money.is_zero());
        assert_eq!(money.amount, Decimal::ZERO);
        assert_eq!(money.currency, Currency::Xaf);
    }

    #[test]
    fn test_money_is_negative() {
        assert!(!Money::new(dec!(10), Currency::Eur).is_negative());
        assert!(Money::new(dec!(-10), Currency::Eur).is_negative());
        assert!(!Money::new(dec!(0), Currency::Eur).is_negative());
    }

    #[test]
    fn test_money_rounding_follows_minor_units() {
        assert_eq!(Money::new(dec!(1180.5), Currency::Xof).rounded().amount, dec!(1180));
        assert_eq!(Money::new(dec!(1181.5), Currency::Xof).rounded().amount, dec!(1182));
        assert_eq!(Money::new(dec!(10.125), Currency::Eur).rounded().amount, dec!(10.12));
    }

    #[test]
    fn test_currency_default_is_xof() {
        assert_eq!(Currency::default(), Currency::Xof);
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Xof.to_string(), "XOF");
        assert_eq!(Currency::Xaf.to_string(), "XAF");
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Usd.to_string(), "USD");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("XOF").unwrap(), Currency::Xof);
        assert_eq!(Currency::from_str("xaf").unwrap(), Currency::Xaf);
        assert_eq!(Currency::from_str("EUR").unwrap(), Currency::Eur);
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);

        assert!(Currency::from_str("IDR").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
