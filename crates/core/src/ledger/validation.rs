//! Business rule validation for entry lines.

use ohada_shared::types::Currency;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryTotals, LineInput};

/// Largest accepted difference between total debit and total credit.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Minimum number of lines in an entry.
pub const MIN_LINES: usize = 2;

/// Returns true if debits and credits agree within [`BALANCE_TOLERANCE`].
///
/// Every balance check in the workspace goes through this function.
#[must_use]
pub fn is_balanced(total_debit: Decimal, total_credit: Decimal) -> bool {
    (total_debit - total_credit).abs() <= BALANCE_TOLERANCE
}

/// Checks a single line: exactly one of debit and credit is positive.
pub fn validate_line(index: usize, debit: Decimal, credit: Decimal) -> Result<(), LedgerError> {
    let reason = if debit < Decimal::ZERO || credit < Decimal::ZERO {
        "amounts must not be negative"
    } else if debit > Decimal::ZERO && credit > Decimal::ZERO {
        "debit and credit are both set"
    } else if debit.is_zero() && credit.is_zero() {
        "debit or credit must be set"
    } else {
        return Ok(());
    };
    Err(LedgerError::InvalidLine { index, reason })
}

/// Rejects amounts finer than the currency's minor unit.
///
/// Trailing zeros do not count, so `250.00` is a valid XOF amount.
pub fn validate_scale(lines: &[LineInput], currency: Currency) -> Result<(), LedgerError> {
    let places = currency.minor_units();
    match lines.iter().position(|l| {
        l.debit.normalize().scale() > places || l.credit.normalize().scale() > places
    }) {
        Some(index) => Err(LedgerError::InvalidAmountScale { index, currency }),
        None => Ok(()),
    }
}

/// Validates a set of lines and returns their totals.
///
/// Checks, in order: each line, the line count, then the balance.
pub fn validate_lines(lines: &[LineInput]) -> Result<EntryTotals, LedgerError> {
    for (index, line) in lines.iter().enumerate() {
        validate_line(index, line.debit, line.credit)?;
    }

    if lines.len() < MIN_LINES {
        return Err(LedgerError::InsufficientLines);
    }

    let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
    let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
    let totals = EntryTotals::new(total_debit, total_credit);

    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedEntry {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(totals)
}
