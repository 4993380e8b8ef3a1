//! Business events and the entry proposals built from them.

use chrono::NaiveDate;
use ohada_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::journal::JournalType;
use crate::ledger::{CreateEntryInput, EntryReference, EntryTotals, LineInput};

/// A customer invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleEvent {
    /// Invoice number.
    pub reference: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer name, used in labels.
    pub customer: String,
    /// Tax-exclusive amount (HT).
    pub amount_ht: Decimal,
    /// VAT rate in percent (18 for 18%).
    pub tax_rate: Decimal,
    /// Invoice currency.
    #[serde(default)]
    pub currency: Currency,
}

/// A supplier bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    /// Bill number.
    pub reference: String,
    /// Bill date.
    pub date: NaiveDate,
    /// Supplier name, used in labels.
    pub supplier: String,
    /// Tax-exclusive amount (HT).
    pub amount_ht: Decimal,
    /// Recoverable VAT rate in percent.
    pub tax_rate: Decimal,
    /// Bill currency.
    #[serde(default)]
    pub currency: Currency,
}

/// How money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Mobile money wallet.
    MobileMoney,
    /// Bank cheque or deposit.
    Bank,
    /// Card payment.
    Card,
    /// Bank transfer.
    Transfer,
}

/// Which way money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentDirection {
    /// Money received from a customer.
    CustomerReceipt,
    /// Money paid to a supplier.
    SupplierPayment,
}

/// A settlement of an invoice or bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// Receipt or payment number.
    pub reference: String,
    /// Payment date.
    pub date: NaiveDate,
    /// Counterparty name, used in labels.
    pub counterparty: String,
    /// Amount paid (TTC).
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Direction.
    pub direction: PaymentDirection,
    /// Payment currency.
    #[serde(default)]
    pub currency: Currency,
}

/// Treasury accounts used by payments, per method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryAccounts {
    /// Cash account.
    pub cash: String,
    /// Mobile money account.
    pub mobile_money: String,
    /// Bank account, also used for cards and transfers.
    pub bank: String,
}

impl Default for TreasuryAccounts {
    fn default() -> Self {
        Self {
            cash: "571".to_string(),
            mobile_money: "531".to_string(),
            bank: "521".to_string(),
        }
    }
}

impl TreasuryAccounts {
    /// Account for a payment method.
    #[must_use]
    pub fn for_method(&self, method: PaymentMethod) -> &str {
        match method {
            PaymentMethod::Cash => &self.cash,
            PaymentMethod::MobileMoney => &self.mobile_money,
            PaymentMethod::Bank | PaymentMethod::Card | PaymentMethod::Transfer => &self.bank,
        }
    }
}

/// Lines a template proposes for an event, already checked for balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingProposal {
    /// Journal type the entry belongs in.
    pub journal_type: JournalType,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry label.
    pub label: String,
    /// Originating business document.
    pub reference: EntryReference,
    /// Entry currency.
    pub currency: Currency,
    /// Proposed lines.
    pub lines: Vec<LineInput>,
    /// Line totals.
    pub totals: EntryTotals,
}

impl PostingProposal {
    /// Turns the proposal into an entry input for the given journal.
    #[must_use]
    pub fn into_entry_input(self, journal: impl Into<String>) -> CreateEntryInput {
        CreateEntryInput {
            journal: journal.into(),
            date: self.date,
            value_date: None,
            label: self.label,
            currency: self.currency,
            lines: self.lines,
            reference: Some(self.reference),
        }
    }
}
