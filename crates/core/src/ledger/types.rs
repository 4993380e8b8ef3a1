//! Inputs and intermediate results of entry creation.

use chrono::NaiveDate;
use ohada_shared::types::{AccountId, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::EntryReference;
use super::validation::is_balanced;
use crate::account::AccountCode;

/// One line of an entry as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// Account number.
    pub account: String,
    /// Line label, the entry label when absent.
    pub label: Option<String>,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Line-level reference (invoice number, lettering code).
    pub reference: Option<String>,
}

impl LineInput {
    /// A debit line.
    #[must_use]
    pub fn debit(account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            label: None,
            debit: amount,
            credit: Decimal::ZERO,
            reference: None,
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            label: None,
            debit: Decimal::ZERO,
            credit: amount,
            reference: None,
        }
    }

    /// Sets the line label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Input for creating an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryInput {
    /// Journal code.
    pub journal: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Value date, the accounting date when absent.
    pub value_date: Option<NaiveDate>,
    /// Entry label.
    pub label: String,
    /// Entry currency.
    #[serde(default)]
    pub currency: Currency,
    /// Lines.
    pub lines: Vec<LineInput>,
    /// Originating business document.
    pub reference: Option<EntryReference>,
}

impl CreateEntryInput {
    /// Creates an input without reference or value date.
    #[must_use]
    pub fn new(
        journal: impl Into<String>,
        date: NaiveDate,
        label: impl Into<String>,
        lines: Vec<LineInput>,
    ) -> Self {
        Self {
            journal: journal.into(),
            date,
            value_date: None,
            label: label.into(),
            currency: Currency::default(),
            lines,
            reference: None,
        }
    }

    /// Sets the business reference.
    #[must_use]
    pub fn with_reference(mut self, reference: EntryReference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// What the entry engine needs to know about a line's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// The account code.
    pub code: AccountCode,
    /// Whether the account accepts lines.
    pub is_active: bool,
    /// The account currency.
    pub currency: Currency,
}

/// Entry totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Whether debits and credits agree within tolerance.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals and checks balance.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: is_balanced(total_debit, total_credit),
        }
    }
}
