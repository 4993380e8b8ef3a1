//! Report data types.

use chrono::NaiveDate;
use ohada_shared::types::{AccountId, Currency, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::{AccountCode, AccountType};

/// Debit/credit totals of one account over a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: AccountCode,
    /// Account label.
    pub label: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Balance, positive on the account's natural side.
    pub balance: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Ledger currency.
    pub currency: Currency,
    /// Accounts with movements, by code.
    pub accounts: Vec<AccountSummary>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Sum of the debit-credit differences each entry was accepted with.
    pub rounding_residual: Decimal,
    /// Whether debits equal credits within tolerance, residual set aside.
    pub is_balanced: bool,
}

/// One account on the balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetLine {
    /// Account code.
    pub code: AccountCode,
    /// Account label.
    pub label: String,
    /// Amount shown on the line's side.
    pub amount: Decimal,
}

/// Balance sheet side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<BalanceSheetLine>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// Balances as of this date.
    pub as_of: NaiveDate,
    /// Ledger currency.
    pub currency: Currency,
    /// Assets (actif).
    pub assets: BalanceSheetSection,
    /// Liabilities and equity (passif), excluding the net result.
    pub liabilities: BalanceSheetSection,
    /// Net result of classes 6 to 8, shown with liabilities.
    pub net_result: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities, net result included.
    pub total_liabilities: Decimal,
    /// Sum of the debit-credit differences each entry was accepted with.
    pub rounding_residual: Decimal,
    /// `total_assets - total_liabilities - rounding_residual`. Non-zero is an
    /// integrity defect.
    pub difference: Decimal,
}

/// Income statement section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountSummary>,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Ledger currency.
    pub currency: Currency,
    /// Debit-natured accounts of classes 6 to 8.
    pub expenses: IncomeStatementSection,
    /// Credit-natured accounts of classes 6 to 8.
    pub revenues: IncomeStatementSection,
    /// Revenues minus expenses.
    pub net_income: Decimal,
    /// Net income over revenues, in percent with 2 decimals. Zero without revenues.
    pub profit_margin: Decimal,
}

/// One line in an account ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedgerLine {
    /// Entry ID.
    pub entry_id: EntryId,
    /// Entry number.
    pub number: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Journal code.
    pub journal: String,
    /// Line label.
    pub label: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this line.
    pub running_balance: Decimal,
}

/// General ledger of one account over a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedgerReport {
    /// Account code.
    pub code: AccountCode,
    /// Account label.
    pub label: String,
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Balance before `period_start`.
    pub opening_balance: Decimal,
    /// Lines in `(date, number)` order.
    pub lines: Vec<AccountLedgerLine>,
    /// Debits in range.
    pub total_debit: Decimal,
    /// Credits in range.
    pub total_credit: Decimal,
    /// Balance after the last line.
    pub closing_balance: Decimal,
}

/// An account whose cached balance disagrees with the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDivergence {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: AccountCode,
    /// Cached balance.
    pub cached: Decimal,
    /// Balance replayed from committed entries.
    pub replayed: Decimal,
}

/// Result of comparing cached balances with a ledger replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Number of accounts compared.
    pub checked_accounts: usize,
    /// Accounts that disagree.
    pub divergences: Vec<BalanceDivergence>,
}

impl ReconciliationReport {
    /// Returns true if every cached balance matches the replay.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.divergences.is_empty()
    }
}
