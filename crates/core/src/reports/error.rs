//! Report error types.

use chrono::NaiveDate;
use ohada_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Assets and liabilities disagree.
    #[error("Balance sheet does not balance as of {as_of}: difference {difference}")]
    BalanceSheetMismatch {
        /// Report date.
        as_of: NaiveDate,
        /// Assets minus liabilities.
        difference: Decimal,
    },

    /// Cached balance diverges from the ledger replay.
    #[error("Cached balance of account {account} is {cached}, ledger replay gives {replayed}")]
    BalanceDivergence {
        /// Account code.
        account: String,
        /// Cached balance.
        cached: Decimal,
        /// Replayed balance.
        replayed: Decimal,
    },
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::BalanceSheetMismatch { .. } => "BALANCE_SHEET_MISMATCH",
            Self::BalanceDivergence { .. } => "BALANCE_DIVERGENCE",
        }
    }

    /// Returns true for broken invariants rather than bad requests.
    #[must_use]
    pub fn is_integrity_defect(&self) -> bool {
        matches!(
            self,
            Self::BalanceSheetMismatch { .. } | Self::BalanceDivergence { .. }
        )
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::AccountNotFound(_) => Self::NotFound(message),
            ReportError::InvalidDateRange { .. } => Self::Validation(message),
            ReportError::BalanceSheetMismatch { .. } | ReportError::BalanceDivergence { .. } => {
                Self::Integrity(message)
            }
        }
    }
}
