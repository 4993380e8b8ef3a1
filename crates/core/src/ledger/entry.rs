//! Accounting entries and their lines.

use chrono::{DateTime, NaiveDate, Utc};
use ohada_shared::types::{AccountId, CompanyId, Currency, EntryId, FiscalYearId, JournalId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{EntryAction, EntryStatus};
use crate::account::AccountCode;
use crate::journal::EntryNumber;

/// One debit or credit line of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account number.
    pub account: AccountCode,
    /// Line label.
    pub label: String,
    /// Debit amount. Exactly one of debit and credit is positive.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line-level reference.
    pub reference: Option<String>,
}

/// Business document an entry originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReference {
    /// Human-readable reference (invoice number, receipt number).
    pub reference: String,
    /// Kind of document (`invoice`, `bill`, `payment`).
    pub reference_type: Option<String>,
    /// ID of the document in its own system.
    pub reference_id: Option<String>,
}

impl EntryReference {
    /// A reference with its document kind.
    #[must_use]
    pub fn new(reference: impl Into<String>, reference_type: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            reference_type: Some(reference_type.into()),
            reference_id: None,
        }
    }
}

/// An atomic, balanced set of lines recorded in one journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingEntry {
    /// Entry ID.
    pub id: EntryId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Number assigned by the journal.
    pub number: EntryNumber,
    /// Journal ID.
    pub journal_id: JournalId,
    /// Journal code.
    pub journal: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Value date.
    pub value_date: NaiveDate,
    /// Entry label.
    pub label: String,
    /// Originating business document.
    pub reference: Option<EntryReference>,
    /// Lines.
    pub lines: Vec<EntryLine>,
    /// Sum of line debits.
    pub total_debit: Decimal,
    /// Sum of line credits.
    pub total_credit: Decimal,
    /// Fiscal year the entry belongs to.
    pub fiscal_year_id: FiscalYearId,
    /// Entry currency.
    pub currency: Currency,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Creator.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Poster.
    pub posted_by: Option<UserId>,
    /// Posting timestamp.
    pub posted_at: Option<DateTime<Utc>>,
    /// Validator.
    pub validated_by: Option<UserId>,
    /// Validation timestamp.
    pub validated_at: Option<DateTime<Utc>>,
    /// Canceller.
    pub cancelled_by: Option<UserId>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Incremented on every status transition.
    pub version: u64,
}

impl AccountingEntry {
    /// Calendar month of the entry date, as `YYYY-MM`.
    #[must_use]
    pub fn period(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Returns true if any line touches the account.
    #[must_use]
    pub fn touches(&self, account: &AccountCode) -> bool {
        self.lines.iter().any(|line| &line.account == account)
    }

    /// Records a checked transition.
    ///
    /// The action must come from [`super::LedgerService`], which checks it
    /// against the entry's current status.
    pub fn apply(&mut self, action: &EntryAction) {
        match *action {
            EntryAction::Post {
                posted_by,
                posted_at,
            } => {
                self.posted_by = Some(posted_by);
                self.posted_at = Some(posted_at);
                self.updated_at = posted_at;
            }
            EntryAction::Validate {
                validated_by,
                validated_at,
            } => {
                self.validated_by = Some(validated_by);
                self.validated_at = Some(validated_at);
                self.updated_at = validated_at;
            }
            EntryAction::Cancel {
                cancelled_by,
                cancelled_at,
                ..
            } => {
                self.cancelled_by = Some(cancelled_by);
                self.cancelled_at = Some(cancelled_at);
                self.updated_at = cancelled_at;
            }
        }
        self.status = action.new_status();
        self.version += 1;
    }
}

/// Filter for entry listings. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Journal code.
    pub journal: Option<String>,
    /// Status.
    pub status: Option<EntryStatus>,
    /// Period, as `YYYY-MM`.
    pub period: Option<String>,
    /// Entries on or after this date.
    pub from: Option<NaiveDate>,
    /// Entries on or before this date.
    pub to: Option<NaiveDate>,
}

impl EntryFilter {
    /// Returns true if the entry passes every set criterion.
    #[must_use]
    pub fn matches(&self, entry: &AccountingEntry) -> bool {
        self.journal.as_ref().is_none_or(|j| &entry.journal == j)
            && self.status.is_none_or(|s| entry.status == s)
            && self.period.as_ref().is_none_or(|p| &entry.period() == p)
            && self.from.is_none_or(|d| entry.date >= d)
            && self.to.is_none_or(|d| entry.date <= d)
    }
}
