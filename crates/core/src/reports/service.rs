//! Report generation service.
//!
//! Every report is computed from a snapshot of committed entries. Only posted
//! and validated entries in the ledger currency are counted.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use ohada_shared::types::{AccountId, Currency};
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountLedgerLine, AccountLedgerReport, AccountSummary, BalanceDivergence, BalanceSheetLine,
    BalanceSheetReport, BalanceSheetSection, IncomeStatementReport, IncomeStatementSection,
    ReconciliationReport, TrialBalanceReport, TrialBalanceTotals,
};
use crate::account::{Account, AccountClass, AccountCode, ChartOfAccounts, NaturalBalance};
use crate::ledger::{AccountBalance, AccountingEntry, RunningBalance, is_balanced};

/// Debit and credit totals per account.
type Movements = BTreeMap<AccountCode, (Decimal, Decimal)>;

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// General ledger of one account over `[start, end]`.
    pub fn account_ledger(
        chart: &ChartOfAccounts,
        entries: &[AccountingEntry],
        currency: Currency,
        code: &AccountCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AccountLedgerReport, ReportError> {
        Self::check_range(start, end)?;
        let account = chart
            .get(code)
            .ok_or_else(|| ReportError::AccountNotFound(code.to_string()))?;
        let side = account.natural_balance();

        let mut opening = Decimal::ZERO;
        let mut in_range = Vec::new();
        for entry in Self::committed(entries, currency) {
            for line in entry.lines.iter().filter(|l| &l.account == code) {
                if entry.date < start {
                    opening += side.signed(line.debit, line.credit);
                } else if entry.date <= end {
                    in_range.push((entry, line));
                }
            }
        }
        in_range.sort_by(|(a, _), (b, _)| (a.date, &a.number).cmp(&(b.date, &b.number)));

        let mut running = RunningBalance::opening(opening);
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let lines = in_range
            .into_iter()
            .map(|(entry, line)| {
                running = RunningBalance::next_entry(&running, side.signed(line.debit, line.credit));
                total_debit += line.debit;
                total_credit += line.credit;
                AccountLedgerLine {
                    entry_id: entry.id,
                    number: entry.number.to_string(),
                    date: entry.date,
                    journal: entry.journal.clone(),
                    label: line.label.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    running_balance: running.current_balance,
                }
            })
            .collect();

        Ok(AccountLedgerReport {
            code: code.clone(),
            label: account.label.clone(),
            period_start: start,
            period_end: end,
            opening_balance: opening,
            lines,
            total_debit,
            total_credit,
            closing_balance: running.current_balance,
        })
    }

    /// Trial balance over `[start, end]`: every account with movements.
    pub fn trial_balance(
        chart: &ChartOfAccounts,
        entries: &[AccountingEntry],
        currency: Currency,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        Self::check_range(start, end)?;
        let movements = Self::movements(entries, currency, |date| date >= start && date <= end);
        let accounts = Self::summaries(chart, &movements)?;

        let total_debit: Decimal = accounts.iter().map(|a| a.total_debit).sum();
        let total_credit: Decimal = accounts.iter().map(|a| a.total_credit).sum();
        let residual = Self::residual(entries, currency, |date| date >= start && date <= end);

        Ok(TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            period_start: start,
            period_end: end,
            currency,
            accounts,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                rounding_residual: residual,
                is_balanced: is_balanced(total_debit - residual, total_credit),
            },
        })
    }

    /// Balance sheet as of a date.
    ///
    /// Class 1 goes to liabilities and classes 2-3 to assets. Classes 4-5 go
    /// to assets when their debit exceeds their credit and to liabilities
    /// otherwise. The net result of classes 6-8 sits with liabilities.
    ///
    /// Each entry may be off by up to the balance tolerance, so the sum of
    /// those residuals is reported apart and `difference` is net of it.
    pub fn balance_sheet(
        chart: &ChartOfAccounts,
        entries: &[AccountingEntry],
        currency: Currency,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let movements = Self::movements(entries, currency, |date| date <= as_of);

        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut net_result = Decimal::ZERO;

        for (code, (debit, credit)) in &movements {
            let net_debit = *debit - *credit;
            if net_debit.is_zero() {
                continue;
            }
            let account = Self::account(chart, code)?;
            match code.class() {
                AccountClass::Equity => Self::push(&mut liabilities, account, -net_debit),
                AccountClass::FixedAssets | AccountClass::Inventory => {
                    Self::push(&mut assets, account, net_debit);
                }
                AccountClass::ThirdParty | AccountClass::Treasury => {
                    if net_debit > Decimal::ZERO {
                        Self::push(&mut assets, account, net_debit);
                    } else {
                        Self::push(&mut liabilities, account, -net_debit);
                    }
                }
                AccountClass::Expenses | AccountClass::Revenues | AccountClass::Other => {
                    net_result -= net_debit;
                }
            }
        }

        let total_assets = assets.total;
        let total_liabilities = liabilities.total + net_result;
        let rounding_residual = Self::residual(entries, currency, |date| date <= as_of);

        Ok(BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            currency,
            assets,
            liabilities,
            net_result,
            total_assets,
            total_liabilities,
            rounding_residual,
            difference: total_assets - total_liabilities - rounding_residual,
        })
    }

    /// Fails with `BalanceSheetMismatch` unless assets equal liabilities once
    /// the accepted entry residuals are set aside.
    pub fn verify_balance_sheet(report: &BalanceSheetReport) -> Result<(), ReportError> {
        if is_balanced(
            report.total_assets - report.rounding_residual,
            report.total_liabilities,
        ) {
            Ok(())
        } else {
            Err(ReportError::BalanceSheetMismatch {
                as_of: report.as_of,
                difference: report.difference,
            })
        }
    }

    /// Income statement over `[start, end]`, classes 6 to 8 split by natural side.
    pub fn income_statement(
        chart: &ChartOfAccounts,
        entries: &[AccountingEntry],
        currency: Currency,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        Self::check_range(start, end)?;
        let movements = Self::movements(entries, currency, |date| date >= start && date <= end);

        let mut expenses = IncomeStatementSection::default();
        let mut revenues = IncomeStatementSection::default();
        for summary in Self::summaries(chart, &movements)? {
            if summary.code.class().is_balance_sheet() {
                continue;
            }
            let section = match summary.code.natural_balance() {
                NaturalBalance::Debit => &mut expenses,
                NaturalBalance::Credit => &mut revenues,
            };
            section.total += summary.balance;
            section.accounts.push(summary);
        }

        let net_income = revenues.total - expenses.total;
        let profit_margin = if revenues.total.is_zero() {
            Decimal::ZERO
        } else {
            (net_income / revenues.total * Decimal::ONE_HUNDRED).round_dp(2)
        };

        Ok(IncomeStatementReport {
            report_type: "income_statement".to_string(),
            period_start: start,
            period_end: end,
            currency,
            expenses,
            revenues,
            net_income,
            profit_margin,
        })
    }

    /// Recomputes every account balance from committed entries.
    #[must_use]
    pub fn replay_balances(
        chart: &ChartOfAccounts,
        entries: &[AccountingEntry],
    ) -> HashMap<AccountId, AccountBalance> {
        let mut balances: HashMap<AccountId, AccountBalance> = HashMap::new();
        for entry in entries.iter().filter(|e| e.status.affects_balances()) {
            for line in &entry.lines {
                let side = chart
                    .get(&line.account)
                    .map_or_else(|| line.account.natural_balance(), Account::natural_balance);
                balances
                    .entry(line.account_id)
                    .or_insert_with(|| AccountBalance::new(line.account_id, side))
                    .apply(line.debit, line.credit);
            }
        }
        balances
    }

    /// Compares cached balances with a ledger replay.
    ///
    /// Accounts missing on either side count as zero.
    #[must_use]
    pub fn reconcile(
        chart: &ChartOfAccounts,
        entries: &[AccountingEntry],
        cached: &HashMap<AccountId, AccountBalance>,
    ) -> ReconciliationReport {
        let replayed = Self::replay_balances(chart, entries);
        let accounts = chart.accounts();

        let divergences = accounts
            .iter()
            .filter_map(|account| {
                let cached = cached.get(&account.id);
                let replay = replayed.get(&account.id);
                let totals = |b: &AccountBalance| (b.debit_balance, b.credit_balance);
                let zero = (Decimal::ZERO, Decimal::ZERO);
                let consistent = cached.map_or(zero, totals) == replay.map_or(zero, totals)
                    && cached.is_none_or(|b| {
                        b.balance == account.natural_balance().signed(b.debit_balance, b.credit_balance)
                    });
                (!consistent).then(|| BalanceDivergence {
                    account_id: account.id,
                    code: account.code.clone(),
                    cached: cached.map_or(Decimal::ZERO, |b| b.balance),
                    replayed: replay.map_or(Decimal::ZERO, |b| b.balance),
                })
            })
            .collect();

        ReconciliationReport {
            checked_accounts: accounts.len(),
            divergences,
        }
    }

    /// Signed balance of every account with movements up to `as_of`.
    #[must_use]
    pub fn closing_balances(
        entries: &[AccountingEntry],
        currency: Currency,
        as_of: NaiveDate,
    ) -> BTreeMap<AccountCode, Decimal> {
        Self::movements(entries, currency, |date| date <= as_of)
            .into_iter()
            .map(|(code, (debit, credit))| {
                let balance = code.natural_balance().signed(debit, credit);
                (code, balance)
            })
            .collect()
    }

    fn committed(
        entries: &[AccountingEntry],
        currency: Currency,
    ) -> impl Iterator<Item = &AccountingEntry> {
        entries
            .iter()
            .filter(move |e| e.status.affects_balances() && e.currency == currency)
    }

    fn movements<F>(entries: &[AccountingEntry], currency: Currency, in_scope: F) -> Movements
    where
        F: Fn(NaiveDate) -> bool,
    {
        let mut movements = Movements::new();
        for entry in Self::committed(entries, currency).filter(|e| in_scope(e.date)) {
            for line in &entry.lines {
                let slot = movements.entry(line.account.clone()).or_default();
                slot.0 += line.debit;
                slot.1 += line.credit;
            }
        }
        movements
    }

    /// Sum of `total_debit - total_credit` over committed entries in scope.
    fn residual<F>(entries: &[AccountingEntry], currency: Currency, in_scope: F) -> Decimal
    where
        F: Fn(NaiveDate) -> bool,
    {
        Self::committed(entries, currency)
            .filter(|e| in_scope(e.date))
            .map(|e| e.total_debit - e.total_credit)
            .sum()
    }

    fn summaries(
        chart: &ChartOfAccounts,
        movements: &Movements,
    ) -> Result<Vec<AccountSummary>, ReportError> {
        movements
            .iter()
            .map(|(code, (debit, credit))| {
                let account = Self::account(chart, code)?;
                Ok(AccountSummary {
                    account_id: account.id,
                    code: code.clone(),
                    label: account.label.clone(),
                    account_type: account.account_type,
                    total_debit: *debit,
                    total_credit: *credit,
                    balance: account.natural_balance().signed(*debit, *credit),
                })
            })
            .collect()
    }

    fn account<'a>(chart: &'a ChartOfAccounts, code: &AccountCode) -> Result<&'a Account, ReportError> {
        chart
            .get(code)
            .ok_or_else(|| ReportError::AccountNotFound(code.to_string()))
    }

    fn push(section: &mut BalanceSheetSection, account: &Account, amount: Decimal) {
        section.total += amount;
        section.accounts.push(BalanceSheetLine {
            code: account.code.clone(),
            label: account.label.clone(),
            amount,
        });
    }

    fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(())
    }
}
