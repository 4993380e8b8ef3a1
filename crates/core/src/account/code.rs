//! Validated SYSCOHADA account codes.
//!
//! Every property of an account that follows from its number (class, level,
//! sub-class, natural balance) is derived here and nowhere else.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::{AccountClass, AccountType, NaturalBalance};
use crate::ledger::LedgerError;

static ACCOUNT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-8][0-9]{0,6}$").expect("valid account code regex"));

/// A SYSCOHADA account number: 1 to 7 digits, the first one being the class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountCode(String);

impl AccountCode {
    /// Parses and validates an account code.
    pub fn parse(code: impl Into<String>) -> Result<Self, LedgerError> {
        let code = code.into();
        if ACCOUNT_CODE_RE.is_match(&code) {
            Ok(Self(code))
        } else {
            Err(LedgerError::InvalidCode(code))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Class of the account, from the first digit.
    #[must_use]
    pub fn class(&self) -> AccountClass {
        AccountClass::from_digit(self.0.as_bytes()[0] - b'0')
    }

    /// Depth in the chart, from 1 (class) to 7.
    #[must_use]
    pub fn level(&self) -> u8 {
        // the pattern caps the length at 7
        u8::try_from(self.0.len()).unwrap_or(u8::MAX)
    }

    /// Two-digit sub-class, or `None` for a class-level code.
    #[must_use]
    pub fn sub_class(&self) -> Option<u8> {
        let bytes = self.0.as_bytes();
        (bytes.len() >= 2).then(|| (bytes[0] - b'0') * 10 + (bytes[1] - b'0'))
    }

    /// Returns true if the code starts with the given digits.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Returns true if `self` is a strict ancestor of `other` in the chart.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    /// The side on which the account normally carries its balance.
    #[must_use]
    pub fn natural_balance(&self) -> NaturalBalance {
        use NaturalBalance::{Credit, Debit};

        let Some(sub) = self.sub_class() else {
            return self.class().default_natural_balance();
        };

        match sub {
            44 if self.starts_with("445") => Debit,
            10..=19 | 28 | 29 | 39 | 40 | 42..=44 | 46 | 48 | 49 | 56 | 59 | 70..=79 => Credit,
            20..=27 | 30..=38 | 41 | 45 | 47 | 50..=55 | 57 | 58 | 60..=69 => Debit,
            81 | 83 | 85 | 87 | 89 => Debit,
            // 80, 82, 84, 86, 88
            _ => Credit,
        }
    }

    /// Account type a chart would assign to this code by default.
    #[must_use]
    pub fn default_type(&self) -> AccountType {
        let sub = self.sub_class();
        match self.class() {
            AccountClass::Equity => match sub {
                None | Some(10..=13) => AccountType::Equity,
                Some(_) => AccountType::Liability,
            },
            AccountClass::FixedAssets | AccountClass::Inventory => AccountType::Asset,
            AccountClass::ThirdParty => match self.natural_balance() {
                NaturalBalance::Debit => AccountType::Asset,
                NaturalBalance::Credit => AccountType::Liability,
            },
            AccountClass::Other => match self.natural_balance() {
                NaturalBalance::Debit => AccountType::Expense,
                NaturalBalance::Credit => AccountType::Revenue,
            },
            AccountClass::Treasury => match sub {
                Some(56) => AccountType::Liability,
                _ => AccountType::Asset,
            },
            AccountClass::Expenses => AccountType::Expense,
            AccountClass::Revenues => AccountType::Revenue,
        }
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountCode {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountCode> for String {
    fn from(code: AccountCode) -> Self {
        code.0
    }
}
