//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur during ledger operations:
//! malformed input, missing records, and requests that are well-formed but
//! illegal given the current state of the books.

use chrono::NaiveDate;
use ohada_shared::AppError;
use ohada_shared::types::{Currency, EntryId, FiscalYearId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::journal::JournalType;

/// Broad category of a [`LedgerError`].
///
/// Callers decide how to react from the kind alone: validation errors need
/// corrected input, state conflicts need a different intent, not-found errors
/// point at a wrong reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller's input is malformed.
    Validation,
    /// The referenced record does not exist in the caller's company.
    NotFound,
    /// The request is well-formed but illegal given the current state.
    StateConflict,
    /// An internal invariant was broken.
    Internal,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Account code does not match `^[1-8][0-9]{0,6}$`.
    #[error("Invalid account code '{0}': expected 1 to 7 digits starting with a class digit 1-8")]
    InvalidCode(String),

    /// A line sets both debit and credit, neither, or a negative amount.
    #[error("Invalid line {index}: {reason}")]
    InvalidLine {
        /// Zero-based position of the line in the entry.
        index: usize,
        /// What is wrong with the line.
        reason: &'static str,
    },

    /// A line amount carries more decimals than the entry currency has.
    #[error("Invalid line {index}: {currency} amounts allow {} decimal(s)", .currency.minor_units())]
    InvalidAmountScale {
        /// Zero-based position of the line in the entry.
        index: usize,
        /// Entry currency.
        currency: Currency,
    },

    /// Entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced (debits != credits beyond tolerance).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Account code already exists in the company's chart.
    #[error("Account code {0} already exists")]
    DuplicateCode(String),

    /// Journal code already exists in the company.
    #[error("Journal code {0} already exists")]
    DuplicateJournalCode(String),

    /// Parent account is not a strict prefix of the child account.
    #[error("Account {parent} cannot be the parent of account {code}")]
    InvalidParent {
        /// The child account code.
        code: String,
        /// The rejected parent code.
        parent: String,
    },

    /// Fiscal year dates or periods are malformed.
    #[error("Invalid fiscal year: {0}")]
    InvalidFiscalYear(&'static str),

    /// Fiscal year overlaps another fiscal year of the company.
    #[error("Fiscal year overlaps existing fiscal year {0}")]
    OverlappingFiscalYear(String),

    /// Line account is kept in a different currency than the entry.
    #[error("Account {account} is kept in {account_currency}, entry is in {entry_currency}")]
    CurrencyMismatch {
        /// The account code.
        account: String,
        /// The account's currency.
        account_currency: Currency,
        /// The entry's currency.
        entry_currency: Currency,
    },

    /// Label must not be empty.
    #[error("Label must not be empty")]
    EmptyLabel,

    // ========== Not Found Errors ==========
    /// Account not found in the company's chart.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Journal not found in the company.
    #[error("Journal not found: {0}")]
    JournalNotFound(String),

    /// No journal of this type is flagged as default.
    #[error("No default journal configured for type {0}")]
    NoDefaultJournal(JournalType),

    /// Fiscal year not found in the company.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(FiscalYearId),

    /// Period number is outside the fiscal year.
    #[error("Period {0} not found in fiscal year")]
    PeriodNotFound(u32),

    /// No open fiscal year covers the date.
    #[error("No open fiscal period found for date {0}")]
    NoFiscalPeriod(NaiveDate),

    /// Entry not found in the company.
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    // ========== State Conflict Errors ==========
    /// Status transition is not in the transition table.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// The target period is closed.
    #[error("Period {0} is closed, no posting allowed")]
    ClosedPeriod(String),

    /// The period was already closed.
    #[error("Period {0} is already closed")]
    PeriodAlreadyClosed(u32),

    /// A fiscal year cannot close while periods are open.
    #[error("Cannot close fiscal year: {0} period(s) still open")]
    OpenPeriodsRemain(usize),

    /// Account is referenced by entry lines.
    #[error("Account {0} is referenced by entries and cannot be deactivated")]
    AccountInUse(String),

    /// Account is inactive and cannot be used.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    /// Journal is inactive and cannot be used.
    #[error("Journal {0} is inactive")]
    JournalInactive(String),

    // ========== Internal Errors ==========
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Builds an [`LedgerError::InvalidTransition`] from any two displayable states.
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns the broad category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCode(_)
            | Self::InvalidLine { .. }
            | Self::InvalidAmountScale { .. }
            | Self::InsufficientLines
            | Self::UnbalancedEntry { .. }
            | Self::DuplicateCode(_)
            | Self::DuplicateJournalCode(_)
            | Self::InvalidParent { .. }
            | Self::InvalidFiscalYear(_)
            | Self::OverlappingFiscalYear(_)
            | Self::CurrencyMismatch { .. }
            | Self::EmptyLabel => ErrorKind::Validation,

            Self::AccountNotFound(_)
            | Self::JournalNotFound(_)
            | Self::NoDefaultJournal(_)
            | Self::FiscalYearNotFound(_)
            | Self::PeriodNotFound(_)
            | Self::NoFiscalPeriod(_)
            | Self::EntryNotFound(_) => ErrorKind::NotFound,

            Self::InvalidTransition { .. }
            | Self::ClosedPeriod(_)
            | Self::PeriodAlreadyClosed(_)
            | Self::OpenPeriodsRemain(_)
            | Self::AccountInUse(_)
            | Self::AccountInactive(_)
            | Self::JournalInactive(_) => ErrorKind::StateConflict,

            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCode(_) => "INVALID_CODE",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::InvalidAmountScale { .. } => "INVALID_AMOUNT_SCALE",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::DuplicateJournalCode(_) => "DUPLICATE_JOURNAL_CODE",
            Self::InvalidParent { .. } => "INVALID_PARENT",
            Self::InvalidFiscalYear(_) => "INVALID_FISCAL_YEAR",
            Self::OverlappingFiscalYear(_) => "OVERLAPPING_FISCAL_YEAR",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::EmptyLabel => "EMPTY_LABEL",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            Self::NoDefaultJournal(_) => "NO_DEFAULT_JOURNAL",
            Self::FiscalYearNotFound(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::NoFiscalPeriod(_) => "NO_FISCAL_PERIOD",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ClosedPeriod(_) => "CLOSED_PERIOD",
            Self::PeriodAlreadyClosed(_) => "PERIOD_ALREADY_CLOSED",
            Self::OpenPeriodsRemain(_) => "OPEN_PERIODS_REMAIN",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::JournalInactive(_) => "JOURNAL_INACTIVE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::StateConflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// Returns true if retrying the same request may succeed.
    ///
    /// Ledger errors are deterministic: retrying an unchanged request fails
    /// identically, so nothing is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::StateConflict => Self::Conflict(message),
            ErrorKind::Internal => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LedgerError::InvalidCode("9".into()), "INVALID_CODE", 400)]
    #[case(LedgerError::InsufficientLines, "INSUFFICIENT_LINES", 400)]
    #[case(LedgerError::DuplicateCode("411".into()), "DUPLICATE_CODE", 400)]
    #[case(LedgerError::AccountNotFound("411".into()), "ACCOUNT_NOT_FOUND", 404)]
    #[case(LedgerError::PeriodNotFound(13), "PERIOD_NOT_FOUND", 404)]
    #[case(LedgerError::ClosedPeriod("2024-03".into()), "CLOSED_PERIOD", 409)]
    #[case(LedgerError::PeriodAlreadyClosed(3), "PERIOD_ALREADY_CLOSED", 409)]
    #[case(LedgerError::OpenPeriodsRemain(2), "OPEN_PERIODS_REMAIN", 409)]
    #[case(LedgerError::AccountInUse("411".into()), "ACCOUNT_IN_USE", 409)]
    #[case(LedgerError::Internal("boom".into()), "INTERNAL_ERROR", 500)]
    fn test_codes_and_status(
        #[case] err: LedgerError,
        #[case] code: &str,
        #[case] status: u16,
    ) {
        assert_eq!(err.error_code(), code);
        assert_eq!(err.http_status_code(), status);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_amount_scale_display() {
        let err = LedgerError::InvalidAmountScale {
            index: 1,
            currency: Currency::Xof,
        };
        assert_eq!(err.to_string(), "Invalid line 1: XOF amounts allow 0 decimal(s)");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unbalanced_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: Decimal::new(118_000, 2),
            credit: Decimal::new(100_000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Entry is not balanced. Debit: 1180.00, Credit: 1000.00"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = LedgerError::invalid_transition("validated", "cancelled");
        assert_eq!(
            err.to_string(),
            "Invalid status transition from validated to cancelled"
        );
        assert_eq!(err.kind(), ErrorKind::StateConflict);
    }

    #[test]
    fn test_maps_to_app_error_by_kind() {
        assert_eq!(
            AppError::from(LedgerError::UnbalancedEntry {
                debit: Decimal::ONE,
                credit: Decimal::ZERO
            })
            .error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::from(LedgerError::JournalNotFound("VT".into())).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            AppError::from(LedgerError::ClosedPeriod("2024-01".into())).error_code(),
            "CONFLICT"
        );
    }
}
