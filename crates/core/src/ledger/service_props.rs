//! Property-based tests for the entry lifecycle.
//!
//! Properties: terminal states, version counting, and delta conservation.

use chrono::{NaiveDate, Utc};
use ohada_shared::types::{AccountId, CompanyId, Currency, EntryId, FiscalYearId, JournalId, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::{AccountingEntry, EntryLine};
use super::service::LedgerService;
use super::status::{EntryAction, EntryStatus};
use crate::account::AccountCode;
use crate::journal::EntryNumber;

#[derive(Debug, Clone, Copy)]
enum Op {
    Post,
    Validate,
    Cancel,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Post), Just(Op::Validate), Just(Op::Cancel)]
}

fn run(status: EntryStatus, op: Op, user: UserId) -> Result<EntryAction, super::LedgerError> {
    match op {
        Op::Post => LedgerService::post(status, user),
        Op::Validate => LedgerService::validate(status, user),
        Op::Cancel => LedgerService::cancel(status, user),
    }
}

fn draft_entry(lines: Vec<EntryLine>) -> AccountingEntry {
    let total_debit = lines.iter().map(|l| l.debit).sum();
    let total_credit = lines.iter().map(|l| l.credit).sum();
    let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
    AccountingEntry {
        id: EntryId::new(),
        company_id: CompanyId::new(),
        number: EntryNumber {
            prefix: "OD".into(),
            year: 2024,
            month: 5,
            sequence: 1,
        },
        journal_id: JournalId::new(),
        journal: "OD".into(),
        date,
        value_date: date,
        label: "Test".into(),
        reference: None,
        lines,
        total_debit,
        total_credit,
        fiscal_year_id: FiscalYearId::new(),
        currency: Currency::Xof,
        status: EntryStatus::Draft,
        created_by: UserId::new(),
        created_at: Utc::now(),
        posted_by: None,
        posted_at: None,
        validated_by: None,
        validated_at: None,
        cancelled_by: None,
        cancelled_at: None,
        updated_at: Utc::now(),
        version: 0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No sequence of operations moves an entry out of a terminal status,
    /// and the version counts exactly the successful transitions.
    #[test]
    fn prop_terminal_states_are_final(ops in prop::collection::vec(op_strategy(), 1..20)) {
        let user = UserId::new();
        let mut entry = draft_entry(Vec::new());
        let mut successes = 0u64;

        for op in ops {
            let before = entry.status;
            match run(before, op, user) {
                Ok(action) => {
                    prop_assert!(!before.is_terminal());
                    prop_assert!(before.can_transition_to(action.new_status()));
                    entry.apply(&action);
                    successes += 1;
                }
                Err(_) => prop_assert_eq!(entry.status, before),
            }
        }

        prop_assert_eq!(entry.version, successes);
    }

    /// Per-account deltas add up to the entry totals.
    #[test]
    fn prop_deltas_conserve_totals(
        amounts in prop::collection::vec((1i64..10_000_000i64, 0usize..3), 1..12),
    ) {
        let accounts: Vec<(AccountId, AccountCode)> = ["411", "701", "443"]
            .into_iter()
            .map(|c| (AccountId::new(), AccountCode::parse(c).unwrap()))
            .collect();
        let mut lines: Vec<EntryLine> = amounts
            .iter()
            .map(|(cents, slot)| EntryLine {
                account_id: accounts[*slot].0,
                account: accounts[*slot].1.clone(),
                label: String::new(),
                debit: Decimal::new(*cents, 2),
                credit: Decimal::ZERO,
                reference: None,
            })
            .collect();
        let total: Decimal = lines.iter().map(|l| l.debit).sum();
        lines.push(EntryLine {
            account_id: accounts[1].0,
            account: accounts[1].1.clone(),
            label: String::new(),
            debit: Decimal::ZERO,
            credit: total,
            reference: None,
        });
        let entry = draft_entry(lines);

        let deltas = LedgerService::balance_deltas(&entry);
        let debit: Decimal = deltas.iter().map(|d| d.debit).sum();
        let credit: Decimal = deltas.iter().map(|d| d.credit).sum();
        prop_assert_eq!(debit, entry.total_debit);
        prop_assert_eq!(credit, entry.total_credit);
        prop_assert!(deltas.windows(2).all(|w| w[0].account_id < w[1].account_id));
    }
}
