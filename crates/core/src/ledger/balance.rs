//! Account balance calculations.
//!
//! Cached balances carry debit and credit totals plus a signed balance that is
//! positive on the account's natural side.

use ohada_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::NaturalBalance;

/// Running totals of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Total debits posted.
    pub debit_balance: Decimal,
    /// Total credits posted.
    pub credit_balance: Decimal,
    /// `debit - credit`, negated for credit-natured accounts.
    pub balance: Decimal,
    /// Side the balance is signed for.
    pub natural_balance: NaturalBalance,
}

impl AccountBalance {
    /// Creates a zero balance.
    #[must_use]
    pub fn new(account_id: AccountId, natural_balance: NaturalBalance) -> Self {
        Self {
            account_id,
            debit_balance: Decimal::ZERO,
            credit_balance: Decimal::ZERO,
            balance: Decimal::ZERO,
            natural_balance,
        }
    }

    /// Adds a posted line's amounts.
    pub fn apply(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_balance += debit;
        self.credit_balance += credit;
        self.recompute();
    }

    /// Removes a previously applied line's amounts.
    pub fn reverse(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_balance -= debit;
        self.credit_balance -= credit;
        self.recompute();
    }

    /// Raw `debit - credit`, regardless of natural side.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit_balance - self.credit_balance
    }

    fn recompute(&mut self) {
        self.balance = self
            .natural_balance
            .signed(self.debit_balance, self.credit_balance);
    }
}

/// Balance before and after one ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Number of lines applied so far.
    pub line_count: u64,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Running balance starting from an opening balance.
    #[must_use]
    pub fn opening(balance: Decimal) -> Self {
        Self {
            line_count: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Running balance after applying `balance_change` to `previous`.
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            line_count: previous.line_count + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }
}
