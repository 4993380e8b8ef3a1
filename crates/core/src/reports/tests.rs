//! Report tests over a small SYSCOHADA ledger.

use chrono::{NaiveDate, Utc};
use ohada_shared::types::{CompanyId, Currency, EntryId, FiscalYearId, JournalId, UserId};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::service::ReportService;
use crate::account::{AccountCode, ChartOfAccounts, default_accounts};
use crate::journal::EntryNumber;
use crate::ledger::{AccountingEntry, EntryLine, EntryStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn code(raw: &str) -> AccountCode {
    AccountCode::parse(raw).unwrap()
}

fn chart() -> ChartOfAccounts {
    let mut chart = ChartOfAccounts::new(CompanyId::new());
    for input in default_accounts() {
        chart.add(input).unwrap();
    }
    chart
}

fn entry(
    chart: &ChartOfAccounts,
    on: NaiveDate,
    sequence: u64,
    status: EntryStatus,
    lines: &[(&str, Decimal, Decimal)],
) -> AccountingEntry {
    let now = Utc::now();
    let lines: Vec<EntryLine> = lines
        .iter()
        .map(|(account, debit, credit)| EntryLine {
            account_id: chart.find(account).unwrap().id,
            account: code(account),
            label: format!("line {account}"),
            debit: *debit,
            credit: *credit,
            reference: None,
        })
        .collect();
    AccountingEntry {
        id: EntryId::new(),
        company_id: chart.company_id(),
        number: EntryNumber {
            prefix: "OD".into(),
            year: 2024,
            month: 1,
            sequence,
        },
        journal_id: JournalId::new(),
        journal: "OD".into(),
        date: on,
        value_date: on,
        label: format!("entry {sequence}"),
        reference: None,
        total_debit: lines.iter().map(|l| l.debit).sum(),
        total_credit: lines.iter().map(|l| l.credit).sum(),
        lines,
        fiscal_year_id: FiscalYearId::new(),
        currency: Currency::Xof,
        status,
        created_by: UserId::new(),
        created_at: now,
        posted_by: None,
        posted_at: None,
        validated_by: None,
        validated_at: None,
        cancelled_by: None,
        cancelled_at: None,
        updated_at: now,
        version: 0,
    }
}

/// Capital contribution, a sale, a purchase and a receipt, plus a draft and
/// a cancelled entry that must never show up.
fn ledger(chart: &ChartOfAccounts) -> Vec<AccountingEntry> {
    vec![
        entry(chart, date(2024, 1, 5), 1, EntryStatus::Posted, &[
            ("521", dec!(100000), dec!(0)),
            ("101", dec!(0), dec!(100000)),
        ]),
        entry(chart, date(2024, 3, 15), 2, EntryStatus::Posted, &[
            ("411", dec!(1180), dec!(0)),
            ("701", dec!(0), dec!(1000)),
            ("443", dec!(0), dec!(180)),
        ]),
        entry(chart, date(2024, 3, 20), 3, EntryStatus::Validated, &[
            ("601", dec!(500), dec!(0)),
            ("445", dec!(90), dec!(0)),
            ("401", dec!(0), dec!(590)),
        ]),
        entry(chart, date(2024, 4, 2), 4, EntryStatus::Posted, &[
            ("521", dec!(1180), dec!(0)),
            ("411", dec!(0), dec!(1180)),
        ]),
        entry(chart, date(2024, 3, 10), 5, EntryStatus::Draft, &[
            ("622", dec!(300), dec!(0)),
            ("571", dec!(0), dec!(300)),
        ]),
        entry(chart, date(2024, 3, 11), 6, EntryStatus::Cancelled, &[
            ("622", dec!(700), dec!(0)),
            ("571", dec!(0), dec!(700)),
        ]),
    ]
}

#[test]
fn test_trial_balance_counts_committed_entries_only() {
    let chart = chart();
    let entries = ledger(&chart);

    let report = ReportService::trial_balance(
        &chart,
        &entries,
        Currency::Xof,
        date(2024, 3, 1),
        date(2024, 3, 31),
    )
    .unwrap();

    let codes: Vec<&str> = report.accounts.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["401", "411", "443", "445", "601", "701"]);
    assert_eq!(report.totals.total_debit, dec!(1770));
    assert_eq!(report.totals.total_credit, dec!(1770));
    assert!(report.totals.is_balanced);
    assert_eq!(report.report_type, "trial_balance");

    let customers = &report.accounts[1];
    assert_eq!(customers.balance, dec!(1180));
    let sales = &report.accounts[5];
    assert_eq!(sales.balance, dec!(1000));
}

#[test]
fn test_trial_balance_ignores_other_currencies() {
    let chart = chart();
    let mut entries = ledger(&chart);
    let mut foreign = entry(&chart, date(2024, 3, 18), 7, EntryStatus::Posted, &[
        ("521", dec!(50), dec!(0)),
        ("701", dec!(0), dec!(50)),
    ]);
    foreign.currency = Currency::Eur;
    entries.push(foreign);

    let report = ReportService::trial_balance(
        &chart,
        &entries,
        Currency::Xof,
        date(2024, 3, 1),
        date(2024, 3, 31),
    )
    .unwrap();
    assert_eq!(report.totals.total_debit, dec!(1770));
}

#[rstest]
#[case::trial_balance(ReportService::trial_balance(
    &chart(), &[], Currency::Xof, date(2024, 4, 1), date(2024, 3, 1)
).map(|_| ()))]
#[case::income_statement(ReportService::income_statement(
    &chart(), &[], Currency::Xof, date(2024, 4, 1), date(2024, 3, 1)
).map(|_| ()))]
#[case::account_ledger(ReportService::account_ledger(
    &chart(), &[], Currency::Xof, &code("411"), date(2024, 4, 1), date(2024, 3, 1)
).map(|_| ()))]
fn test_inverted_range_rejected(#[case] result: Result<(), ReportError>) {
    assert!(matches!(result, Err(ReportError::InvalidDateRange { .. })));
}

#[test]
fn test_balance_sheet_balances() {
    let chart = chart();
    let entries = ledger(&chart);

    let report =
        ReportService::balance_sheet(&chart, &entries, Currency::Xof, date(2024, 3, 31)).unwrap();

    assert_eq!(report.total_assets, dec!(101270));
    assert_eq!(report.liabilities.total, dec!(100770));
    assert_eq!(report.net_result, dec!(500));
    assert_eq!(report.total_liabilities, dec!(101270));
    assert_eq!(report.difference, dec!(0));
    ReportService::verify_balance_sheet(&report).unwrap();

    let asset_codes: Vec<&str> = report.assets.accounts.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(asset_codes, vec!["411", "445", "521"]);
    let liability_codes: Vec<&str> =
        report.liabilities.accounts.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(liability_codes, vec!["101", "401", "443"]);
}

#[test]
fn test_settled_receivable_leaves_balance_sheet() {
    let chart = chart();
    let entries = ledger(&chart);

    let report =
        ReportService::balance_sheet(&chart, &entries, Currency::Xof, date(2024, 4, 30)).unwrap();

    assert!(report.assets.accounts.iter().all(|l| l.code.as_str() != "411"));
    assert_eq!(report.total_assets, dec!(101270));
    ReportService::verify_balance_sheet(&report).unwrap();
}

#[test]
fn test_overdrawn_bank_moves_to_liabilities() {
    let chart = chart();
    let entries = vec![entry(&chart, date(2024, 2, 1), 1, EntryStatus::Posted, &[
        ("601", dec!(400), dec!(0)),
        ("521", dec!(0), dec!(400)),
    ])];

    let report =
        ReportService::balance_sheet(&chart, &entries, Currency::Xof, date(2024, 2, 29)).unwrap();

    assert_eq!(report.liabilities.accounts[0].code.as_str(), "521");
    assert_eq!(report.liabilities.accounts[0].amount, dec!(400));
    assert_eq!(report.net_result, dec!(-400));
    assert_eq!(report.difference, dec!(0));
}

#[test]
fn test_verify_balance_sheet_reports_difference() {
    let chart = chart();
    let entries = ledger(&chart);
    let mut report =
        ReportService::balance_sheet(&chart, &entries, Currency::Xof, date(2024, 3, 31)).unwrap();
    report.total_assets += dec!(10);
    report.difference = report.total_assets - report.total_liabilities;

    let err = ReportService::verify_balance_sheet(&report).unwrap_err();
    assert_eq!(err, ReportError::BalanceSheetMismatch {
        as_of: date(2024, 3, 31),
        difference: dec!(10),
    });
    assert!(err.is_integrity_defect());
}

#[test]
fn test_entry_residuals_do_not_unbalance_reports() {
    let chart = chart();
    let entries: Vec<AccountingEntry> = (1..=3)
        .map(|sequence| {
            let mut rounded = entry(&chart, date(2024, 5, 2), sequence, EntryStatus::Posted, &[
                ("411", dec!(100.01), dec!(0)),
                ("701", dec!(0), dec!(100)),
            ]);
            rounded.currency = Currency::Eur;
            rounded
        })
        .collect();

    let sheet =
        ReportService::balance_sheet(&chart, &entries, Currency::Eur, date(2024, 12, 31)).unwrap();
    assert_eq!(sheet.total_assets, dec!(300.03));
    assert_eq!(sheet.total_liabilities, dec!(300));
    assert_eq!(sheet.rounding_residual, dec!(0.03));
    assert_eq!(sheet.difference, dec!(0));
    ReportService::verify_balance_sheet(&sheet).unwrap();

    let trial = ReportService::trial_balance(
        &chart,
        &entries,
        Currency::Eur,
        date(2024, 1, 1),
        date(2024, 12, 31),
    )
    .unwrap();
    assert_eq!(trial.totals.rounding_residual, dec!(0.03));
    assert!(trial.totals.is_balanced);

    // A real divergence on top of the residuals is still caught.
    let mut broken = sheet;
    broken.total_assets += dec!(5);
    broken.difference += dec!(5);
    assert_eq!(
        ReportService::verify_balance_sheet(&broken).unwrap_err(),
        ReportError::BalanceSheetMismatch {
            as_of: date(2024, 12, 31),
            difference: dec!(5),
        }
    );
}

#[test]
fn test_income_statement() {
    let chart = chart();
    let entries = ledger(&chart);

    let report = ReportService::income_statement(
        &chart,
        &entries,
        Currency::Xof,
        date(2024, 1, 1),
        date(2024, 12, 31),
    )
    .unwrap();

    assert_eq!(report.revenues.total, dec!(1000));
    assert_eq!(report.expenses.total, dec!(500));
    assert_eq!(report.net_income, dec!(500));
    assert_eq!(report.profit_margin, dec!(50.00));
    assert_eq!(report.revenues.accounts[0].code.as_str(), "701");
    assert_eq!(report.expenses.accounts[0].code.as_str(), "601");
}

#[test]
fn test_income_statement_without_revenue_has_zero_margin() {
    let chart = chart();
    let entries = ledger(&chart);

    let report = ReportService::income_statement(
        &chart,
        &entries,
        Currency::Xof,
        date(2024, 1, 1),
        date(2024, 1, 31),
    )
    .unwrap();

    assert_eq!(report.net_income, dec!(0));
    assert_eq!(report.profit_margin, dec!(0));
    assert!(report.expenses.accounts.is_empty());
}

#[test]
fn test_account_ledger_running_balance() {
    let chart = chart();
    let entries = ledger(&chart);

    let report = ReportService::account_ledger(
        &chart,
        &entries,
        Currency::Xof,
        &code("521"),
        date(2024, 3, 1),
        date(2024, 4, 30),
    )
    .unwrap();

    assert_eq!(report.opening_balance, dec!(100000));
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].running_balance, dec!(101180));
    assert_eq!(report.total_debit, dec!(1180));
    assert_eq!(report.closing_balance, dec!(101180));
}

#[test]
fn test_account_ledger_orders_by_date_then_number() {
    let chart = chart();
    let mut entries = ledger(&chart);
    entries.push(entry(&chart, date(2024, 3, 15), 1, EntryStatus::Posted, &[
        ("411", dec!(20), dec!(0)),
        ("706", dec!(0), dec!(20)),
    ]));

    let report = ReportService::account_ledger(
        &chart,
        &entries,
        Currency::Xof,
        &code("411"),
        date(2024, 3, 1),
        date(2024, 4, 30),
    )
    .unwrap();

    let running: Vec<Decimal> = report.lines.iter().map(|l| l.running_balance).collect();
    assert_eq!(running, vec![dec!(20), dec!(1200), dec!(20)]);
    assert!(report.lines[0].number.ends_with("00001"));
    assert_eq!(report.opening_balance, dec!(0));
    assert_eq!(report.closing_balance, dec!(20));
}

#[test]
fn test_account_ledger_unknown_account() {
    let chart = chart();
    let result = ReportService::account_ledger(
        &chart,
        &[],
        Currency::Xof,
        &code("4119"),
        date(2024, 1, 1),
        date(2024, 12, 31),
    );
    assert_eq!(result.unwrap_err(), ReportError::AccountNotFound("4119".into()));
}

#[test]
fn test_reconcile_detects_divergence() {
    let chart = chart();
    let entries = ledger(&chart);

    let mut cached = ReportService::replay_balances(&chart, &entries);
    let report = ReportService::reconcile(&chart, &entries, &cached);
    assert!(report.is_consistent());
    assert_eq!(report.checked_accounts, chart.len());

    let customers = chart.find("411").unwrap().id;
    cached.get_mut(&customers).unwrap().apply(dec!(5), dec!(0));

    let report = ReportService::reconcile(&chart, &entries, &cached);
    assert_eq!(report.divergences.len(), 1);
    let divergence = &report.divergences[0];
    assert_eq!(divergence.code.as_str(), "411");
    assert_eq!(divergence.cached, dec!(5));
    assert_eq!(divergence.replayed, dec!(0));
}

#[test]
fn test_reconcile_flags_missing_cache_entry() {
    let chart = chart();
    let entries = ledger(&chart);

    let mut cached = ReportService::replay_balances(&chart, &entries);
    cached.remove(&chart.find("701").unwrap().id);

    let report = ReportService::reconcile(&chart, &entries, &cached);
    assert_eq!(report.divergences.len(), 1);
    assert_eq!(report.divergences[0].replayed, dec!(1000));
}

#[test]
fn test_closing_balances() {
    let chart = chart();
    let entries = ledger(&chart);

    let balances = ReportService::closing_balances(&entries, Currency::Xof, date(2024, 12, 31));

    assert_eq!(balances[&code("521")], dec!(101180));
    assert_eq!(balances[&code("101")], dec!(100000));
    assert_eq!(balances[&code("411")], dec!(0));
    assert_eq!(balances[&code("401")], dec!(590));
    assert!(!balances.contains_key(&code("622")));
}

const LEAVES: &[&str] = &[
    "101", "162", "244", "311", "401", "411", "443", "445", "521", "531", "571", "601", "622",
    "701", "706", "81", "82",
];

fn transfer() -> impl Strategy<Value = (usize, usize, i64, u32)> {
    (0..LEAVES.len(), 0..LEAVES.len(), 1i64..10_000_000, 1u32..=12)
        .prop_filter("distinct accounts", |(a, b, _, _)| a != b)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any ledger of balanced entries yields a balanced trial balance and a
    /// balance sheet whose two sides agree.
    #[test]
    fn prop_balanced_ledger_balances_reports(
        transfers in prop::collection::vec(transfer(), 1..40),
    ) {
        let chart = chart();
        let entries: Vec<AccountingEntry> = transfers
            .iter()
            .enumerate()
            .map(|(i, (from, to, cents, month))| {
                let amount = Decimal::new(*cents, 2);
                entry(&chart, date(2024, *month, 10), i as u64 + 1, EntryStatus::Posted, &[
                    (LEAVES[*from], amount, Decimal::ZERO),
                    (LEAVES[*to], Decimal::ZERO, amount),
                ])
            })
            .collect();

        let trial = ReportService::trial_balance(
            &chart, &entries, Currency::Xof, date(2024, 1, 1), date(2024, 12, 31),
        ).unwrap();
        prop_assert!(trial.totals.is_balanced);
        prop_assert_eq!(trial.totals.total_debit, trial.totals.total_credit);

        let sheet = ReportService::balance_sheet(
            &chart, &entries, Currency::Xof, date(2024, 12, 31),
        ).unwrap();
        prop_assert_eq!(sheet.difference, Decimal::ZERO);
        prop_assert!(ReportService::verify_balance_sheet(&sheet).is_ok());

        let income = ReportService::income_statement(
            &chart, &entries, Currency::Xof, date(2024, 1, 1), date(2024, 12, 31),
        ).unwrap();
        prop_assert_eq!(income.net_income, sheet.net_result);

        let cached = ReportService::replay_balances(&chart, &entries);
        prop_assert!(ReportService::reconcile(&chart, &entries, &cached).is_consistent());
    }
}
