//! Ledger service for entry validation and lifecycle transitions.
//!
//! This module provides the pure business logic the entry engine runs before
//! touching any shared state: line resolution against the chart, status
//! transitions, and the balance deltas an entry carries.

use std::collections::BTreeMap;

use chrono::Utc;
use ohada_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;

use super::entry::{AccountingEntry, EntryLine};
use super::error::LedgerError;
use super::status::{EntryAction, EntryStatus};
use super::types::{AccountInfo, CreateEntryInput, EntryTotals};
use super::validation::{validate_lines, validate_scale};
use crate::account::AccountCode;

/// Debit and credit an entry adds to one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    /// The account.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Stateless ledger service.
///
/// All methods are associated functions with no storage access; callers pass
/// lookups in as closures.
pub struct LedgerService;

impl LedgerService {
    /// Validates an entry input and resolves its lines against the chart.
    ///
    /// Steps, in order:
    /// 1. Line shape, line count and balance (no lookups needed)
    /// 2. Amount precision against the entry currency
    /// 3. Each account: valid code, exists, active, same currency as the entry
    ///
    /// # Arguments
    ///
    /// * `input` - The entry to validate
    /// * `account_lookup` - Resolves an account code within the caller's company
    pub fn prepare_entry<A>(
        input: &CreateEntryInput,
        account_lookup: A,
    ) -> Result<(Vec<EntryLine>, EntryTotals), LedgerError>
    where
        A: Fn(&AccountCode) -> Result<AccountInfo, LedgerError>,
    {
        if input.label.trim().is_empty() {
            return Err(LedgerError::EmptyLabel);
        }
        let totals = validate_lines(&input.lines)?;
        validate_scale(&input.lines, input.currency)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let code = AccountCode::parse(line.account.as_str())?;
            let info = account_lookup(&code)?;
            if !info.is_active {
                return Err(LedgerError::AccountInactive(code.to_string()));
            }
            if info.currency != input.currency {
                return Err(LedgerError::CurrencyMismatch {
                    account: code.to_string(),
                    account_currency: info.currency,
                    entry_currency: input.currency,
                });
            }

            lines.push(EntryLine {
                account_id: info.id,
                account: code,
                label: line.label.clone().unwrap_or_else(|| input.label.clone()),
                debit: line.debit,
                credit: line.credit,
                reference: line.reference.clone(),
            });
        }

        Ok((lines, totals))
    }

    /// Draft -> Posted.
    pub fn post(current_status: EntryStatus, posted_by: UserId) -> Result<EntryAction, LedgerError> {
        Self::check_transition(current_status, EntryStatus::Posted)?;
        Ok(EntryAction::Post {
            posted_by,
            posted_at: Utc::now(),
        })
    }

    /// Posted -> Validated.
    pub fn validate(
        current_status: EntryStatus,
        validated_by: UserId,
    ) -> Result<EntryAction, LedgerError> {
        Self::check_transition(current_status, EntryStatus::Validated)?;
        Ok(EntryAction::Validate {
            validated_by,
            validated_at: Utc::now(),
        })
    }

    /// Draft or Posted -> Cancelled. A posted entry's deltas must be reversed.
    pub fn cancel(
        current_status: EntryStatus,
        cancelled_by: UserId,
    ) -> Result<EntryAction, LedgerError> {
        Self::check_transition(current_status, EntryStatus::Cancelled)?;
        Ok(EntryAction::Cancel {
            cancelled_by,
            cancelled_at: Utc::now(),
            reverses_balances: current_status.affects_balances(),
        })
    }

    /// Rejects any move missing from [`EntryStatus::TRANSITIONS`].
    fn check_transition(current: EntryStatus, target: EntryStatus) -> Result<(), LedgerError> {
        if current.can_transition_to(target) {
            Ok(())
        } else {
            Err(LedgerError::invalid_transition(current, target))
        }
    }

    /// Per-account debit and credit carried by an entry, in account-id order.
    ///
    /// Applying deltas in a stable order keeps concurrent posters from
    /// locking the same balances in opposite orders.
    #[must_use]
    pub fn balance_deltas(entry: &AccountingEntry) -> Vec<BalanceDelta> {
        let mut by_account: BTreeMap<AccountId, (Decimal, Decimal)> = BTreeMap::new();
        for line in &entry.lines {
            let slot = by_account.entry(line.account_id).or_default();
            slot.0 += line.debit;
            slot.1 += line.credit;
        }
        by_account
            .into_iter()
            .map(|(account_id, (debit, credit))| BalanceDelta {
                account_id,
                debit,
                credit,
            })
            .collect()
    }
}
