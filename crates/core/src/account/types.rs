//! Account domain types.

use chrono::{DateTime, Utc};
use ohada_shared::types::{AccountId, CompanyId, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::code::AccountCode;

/// The eight SYSCOHADA account classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Class 1: equity and long-term resources.
    Equity,
    /// Class 2: fixed assets.
    FixedAssets,
    /// Class 3: inventory.
    Inventory,
    /// Class 4: third parties (customers, suppliers, state).
    ThirdParty,
    /// Class 5: treasury.
    Treasury,
    /// Class 6: expenses.
    Expenses,
    /// Class 7: revenues.
    Revenues,
    /// Class 8: other expenses and revenues (out of ordinary activity).
    Other,
}

impl AccountClass {
    /// Maps a class digit to its class. Digits outside 1-8 fall back to `Other`;
    /// codes are validated before reaching here.
    #[must_use]
    pub const fn from_digit(digit: u8) -> Self {
        match digit {
            1 => Self::Equity,
            2 => Self::FixedAssets,
            3 => Self::Inventory,
            4 => Self::ThirdParty,
            5 => Self::Treasury,
            6 => Self::Expenses,
            7 => Self::Revenues,
            _ => Self::Other,
        }
    }

    /// The class digit.
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::Equity => 1,
            Self::FixedAssets => 2,
            Self::Inventory => 3,
            Self::ThirdParty => 4,
            Self::Treasury => 5,
            Self::Expenses => 6,
            Self::Revenues => 7,
            Self::Other => 8,
        }
    }

    /// Classes 1 to 5 appear on the balance sheet; 6 to 8 on the income statement.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        self.digit() <= 5
    }

    /// Natural balance of a class-level (single digit) code.
    #[must_use]
    pub const fn default_natural_balance(self) -> NaturalBalance {
        match self {
            Self::Equity | Self::ThirdParty | Self::Revenues => NaturalBalance::Credit,
            _ => NaturalBalance::Debit,
        }
    }
}

/// Side on which an account normally carries its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalBalance {
    /// Balance grows with debits.
    Debit,
    /// Balance grows with credits.
    Credit,
}

impl NaturalBalance {
    /// Signed balance change for a debit/credit pair, positive on the natural side.
    #[must_use]
    pub fn signed(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Account type used for statement presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset => write!(f, "asset"),
            Self::Liability => write!(f, "liability"),
            Self::Equity => write!(f, "equity"),
            Self::Revenue => write!(f, "revenue"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A node in a company's chart of accounts.
///
/// Class, level and natural balance are never stored; they are derived from
/// `code` on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Account number.
    pub code: AccountCode,
    /// Display label.
    pub label: String,
    /// Presentation type.
    pub account_type: AccountType,
    /// Parent account code.
    pub parent: Option<AccountCode>,
    /// Auxiliary (sub-ledger) account.
    pub is_auxiliary: bool,
    /// Lines on this account can be lettered/reconciled.
    pub is_reconcilable: bool,
    /// Currency the account is kept in.
    pub currency: Currency,
    /// Inactive accounts reject new lines.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Account class.
    #[must_use]
    pub fn class(&self) -> AccountClass {
        self.code.class()
    }

    /// Depth in the chart.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.code.level()
    }

    /// Natural balance side.
    #[must_use]
    pub fn natural_balance(&self) -> NaturalBalance {
        self.code.natural_balance()
    }
}

/// Input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Account number, unvalidated.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Presentation type. Derived from the code when absent.
    pub account_type: Option<AccountType>,
    /// Parent account number.
    pub parent: Option<String>,
    /// Auxiliary flag.
    #[serde(default)]
    pub is_auxiliary: bool,
    /// Reconcilable flag.
    #[serde(default)]
    pub is_reconcilable: bool,
    /// Account currency.
    #[serde(default)]
    pub currency: Currency,
}

impl NewAccount {
    /// Creates an input with default flags and a derived type.
    #[must_use]
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            account_type: None,
            parent: None,
            is_auxiliary: false,
            is_reconcilable: false,
            currency: Currency::default(),
        }
    }

    /// Sets the parent account.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets an explicit account type.
    #[must_use]
    pub fn with_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// Sets the account currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Marks the account reconcilable.
    #[must_use]
    pub fn reconcilable(mut self) -> Self {
        self.is_reconcilable = true;
        self
    }
}
