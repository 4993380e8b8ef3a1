//! Statements over a snapshot of a company's entries.

use std::sync::Arc;

use chrono::NaiveDate;
use ohada_core::account::{AccountCode, ChartOfAccounts};
use ohada_core::ledger::AccountingEntry;
use ohada_core::reports::{
    AccountLedgerReport, BalanceSheetReport, IncomeStatementReport, ReconciliationReport,
    ReportError, ReportService, TrialBalanceReport,
};
use ohada_shared::types::CompanyId;
use tracing::{error, info, warn};

use crate::state::StoreState;

/// Read-only statement generation.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    state: Arc<StoreState>,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }

    /// General ledger of one account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `InvalidDateRange`.
    pub fn account_ledger(
        &self,
        company_id: CompanyId,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AccountLedgerReport, ReportError> {
        let code =
            AccountCode::parse(code).map_err(|_| ReportError::AccountNotFound(code.to_string()))?;
        let (chart, entries) = self.snapshot(company_id);
        ReportService::account_ledger(&chart, &entries, self.state.currency, &code, start, end)
    }

    /// Trial balance over `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start` is after `end`.
    pub fn trial_balance(
        &self,
        company_id: CompanyId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        let (chart, entries) = self.snapshot(company_id);
        let report = ReportService::trial_balance(&chart, &entries, self.state.currency, start, end)?;
        if !report.totals.is_balanced {
            warn!(
                company_id = %company_id,
                debit = %report.totals.total_debit,
                credit = %report.totals.total_credit,
                "Trial balance does not balance"
            );
        }
        Ok(report)
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns `BalanceSheetMismatch` if assets and liabilities disagree.
    pub fn balance_sheet(
        &self,
        company_id: CompanyId,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let (chart, entries) = self.snapshot(company_id);
        let report = ReportService::balance_sheet(&chart, &entries, self.state.currency, as_of)?;
        if let Err(err) = ReportService::verify_balance_sheet(&report) {
            error!(company_id = %company_id, %as_of, error = %err, "Integrity defect");
            return Err(err);
        }
        Ok(report)
    }

    /// Income statement over `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start` is after `end`.
    pub fn income_statement(
        &self,
        company_id: CompanyId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        let (chart, entries) = self.snapshot(company_id);
        ReportService::income_statement(&chart, &entries, self.state.currency, start, end)
    }

    /// Compares every cached balance with a replay of committed entries.
    ///
    /// A post or cancel committing while this runs can show up as a
    /// divergence; run it when the company is quiet.
    #[must_use]
    pub fn reconcile(&self, company_id: CompanyId) -> ReconciliationReport {
        let (chart, entries) = self.snapshot(company_id);
        let cached = self
            .state
            .balances
            .get(&company_id)
            .map(|balances| balances.value().clone())
            .unwrap_or_default();

        let report = ReportService::reconcile(&chart, &entries, &cached);
        for divergence in &report.divergences {
            error!(
                company_id = %company_id,
                code = %divergence.code,
                cached = %divergence.cached,
                replayed = %divergence.replayed,
                "Cached balance diverges from ledger"
            );
        }
        info!(
            company_id = %company_id,
            checked = report.checked_accounts,
            divergences = report.divergences.len(),
            "Balances reconciled"
        );
        report
    }

    /// Fails on the first cached balance that diverges from the ledger.
    ///
    /// # Errors
    ///
    /// Returns `BalanceDivergence` naming the first diverging account.
    pub fn verify_balances(&self, company_id: CompanyId) -> Result<ReconciliationReport, ReportError> {
        let report = self.reconcile(company_id);
        match report.divergences.first() {
            Some(divergence) => Err(ReportError::BalanceDivergence {
                account: divergence.code.to_string(),
                cached: divergence.cached,
                replayed: divergence.replayed,
            }),
            None => Ok(report),
        }
    }

    /// Chart and entries of one company, copied out of the registries.
    ///
    /// Entries are copied first: accounts are never removed, so the chart
    /// copied afterwards knows every account they reference.
    fn snapshot(&self, company_id: CompanyId) -> (ChartOfAccounts, Vec<AccountingEntry>) {
        let entries = self.state.company_entries(company_id);
        let chart = self
            .state
            .charts
            .get(&company_id)
            .map_or_else(|| ChartOfAccounts::new(company_id), |chart| chart.value().clone());
        (chart, entries)
    }
}
