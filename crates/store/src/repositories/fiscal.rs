//! Fiscal calendar.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::mapref::one::RefMut;
use ohada_core::fiscal::{FiscalYear, FiscalYearStatus, NewFiscalYear, Period};
use ohada_core::ledger::LedgerError;
use ohada_core::reports::ReportService;
use ohada_shared::CompanyContext;
use ohada_shared::types::{CompanyId, FiscalYearId};
use tracing::{info, warn};

use crate::state::StoreState;

/// Fiscal years and their periods.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    state: Arc<StoreState>,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }

    /// Creates a draft fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The duration is outside 360 to 370 days
    /// - Explicit periods do not tile the year
    /// - The year overlaps another year of the company
    pub fn create(&self, ctx: &CompanyContext, input: NewFiscalYear) -> Result<FiscalYear, LedgerError> {
        let year = FiscalYear::new(ctx.company_id, input)?;

        // The index entry serializes creations within one company.
        let mut ids = self.state.fiscal_index.entry(ctx.company_id).or_default();
        let overlapping = ids.iter().find_map(|id| {
            self.state
                .fiscal_years
                .get(id)
                .filter(|other| other.overlaps(year.start_date, year.end_date))
                .map(|other| other.name.clone())
        });
        if let Some(name) = overlapping {
            warn!(company_id = %ctx.company_id, year = year.year, overlaps = %name, "Fiscal year rejected");
            return Err(LedgerError::OverlappingFiscalYear(name));
        }

        ids.push(year.id);
        self.state.fiscal_years.insert(year.id, year.clone());

        info!(
            company_id = %ctx.company_id,
            fiscal_year_id = %year.id,
            start = %year.start_date,
            end = %year.end_date,
            periods = year.periods.len(),
            "Fiscal year created"
        );
        Ok(year)
    }

    /// Gets a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound` if the company has no such year.
    pub fn get(&self, company_id: CompanyId, id: FiscalYearId) -> Result<FiscalYear, LedgerError> {
        self.state
            .fiscal_years
            .get(&id)
            .filter(|year| year.company_id == company_id)
            .map(|year| year.value().clone())
            .ok_or(LedgerError::FiscalYearNotFound(id))
    }

    /// Lists a company's fiscal years by start date.
    #[must_use]
    pub fn list(&self, company_id: CompanyId) -> Vec<FiscalYear> {
        let mut years: Vec<FiscalYear> = self
            .state
            .fiscal_year_ids(company_id)
            .into_iter()
            .filter_map(|id| self.state.fiscal_years.get(&id).map(|year| year.value().clone()))
            .collect();
        years.sort_by_key(|year| year.start_date);
        years
    }

    /// Draft -> Open.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the year is a draft.
    pub fn open(&self, ctx: &CompanyContext, id: FiscalYearId) -> Result<FiscalYear, LedgerError> {
        self.update(ctx, id, "Fiscal year opened", FiscalYear::open)
    }

    /// Closes one period of an open year.
    ///
    /// Takes the year's exclusive guard, so no entry commit into the year
    /// is in flight while the flag flips.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition` or `PeriodAlreadyClosed`.
    pub fn close_period(
        &self,
        ctx: &CompanyContext,
        id: FiscalYearId,
        number: u32,
    ) -> Result<Period, LedgerError> {
        let mut year = self.year_mut(ctx.company_id, id)?;
        let period = year.close_period(number, ctx.user_id)?.clone();

        info!(
            company_id = %ctx.company_id,
            fiscal_year_id = %id,
            period = %period.name,
            user_id = %ctx.user_id,
            "Period closed"
        );
        Ok(period)
    }

    /// Open -> Closed, snapshotting every account's balance at the year end.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless open, `OpenPeriodsRemain` unless
    /// every period is closed.
    pub fn close(&self, ctx: &CompanyContext, id: FiscalYearId) -> Result<FiscalYear, LedgerError> {
        let mut year = self.year_mut(ctx.company_id, id)?;
        let entries = self.state.company_entries(ctx.company_id);
        let balances = ReportService::closing_balances(&entries, self.state.currency, year.end_date);
        year.close(ctx.user_id, balances)?;

        info!(
            company_id = %ctx.company_id,
            fiscal_year_id = %id,
            accounts = year.closing_balances.len(),
            user_id = %ctx.user_id,
            "Fiscal year closed"
        );
        Ok(year.clone())
    }

    /// Closed -> Archived.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the year is closed.
    pub fn archive(&self, ctx: &CompanyContext, id: FiscalYearId) -> Result<FiscalYear, LedgerError> {
        self.update(ctx, id, "Fiscal year archived", FiscalYear::archive)
    }

    /// Copies the balance-sheet closing balances of `from` into the opening
    /// balances of `to`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless `from` is closed or archived and
    /// `to` is a draft or open, `InvalidFiscalYear` unless `to` is later.
    pub fn carry_forward(
        &self,
        ctx: &CompanyContext,
        from: FiscalYearId,
        to: FiscalYearId,
    ) -> Result<FiscalYear, LedgerError> {
        let previous = self.get(ctx.company_id, from)?;
        let mut year = self.year_mut(ctx.company_id, to)?;
        year.carry_forward_from(&previous)?;

        info!(
            company_id = %ctx.company_id,
            from = %from,
            to = %to,
            accounts = year.opening_balances.len(),
            "Opening balances carried forward"
        );
        Ok(year.clone())
    }

    /// The open year containing `date`.
    ///
    /// # Errors
    ///
    /// Returns `NoFiscalPeriod` if no open year contains the date.
    pub fn find_current(&self, company_id: CompanyId, date: NaiveDate) -> Result<FiscalYear, LedgerError> {
        self.state
            .fiscal_year_ids(company_id)
            .into_iter()
            .find_map(|id| {
                self.state
                    .fiscal_years
                    .get(&id)
                    .filter(|year| year.status == FiscalYearStatus::Open && year.contains_date(date))
                    .map(|year| year.value().clone())
            })
            .ok_or(LedgerError::NoFiscalPeriod(date))
    }

    /// The period containing `date` in the open year containing it.
    ///
    /// # Errors
    ///
    /// Returns `NoFiscalPeriod` if no open year contains the date.
    pub fn current_period(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<(FiscalYearId, Period), LedgerError> {
        let year = self.find_current(company_id, date)?;
        let period = year
            .period_for(date)
            .cloned()
            .ok_or(LedgerError::NoFiscalPeriod(date))?;
        Ok((year.id, period))
    }

    fn year_mut(
        &self,
        company_id: CompanyId,
        id: FiscalYearId,
    ) -> Result<RefMut<'_, FiscalYearId, FiscalYear>, LedgerError> {
        self.state
            .fiscal_years
            .get_mut(&id)
            .filter(|year| year.company_id == company_id)
            .ok_or(LedgerError::FiscalYearNotFound(id))
    }

    fn update<F>(
        &self,
        ctx: &CompanyContext,
        id: FiscalYearId,
        message: &'static str,
        apply: F,
    ) -> Result<FiscalYear, LedgerError>
    where
        F: FnOnce(&mut FiscalYear) -> Result<(), LedgerError>,
    {
        let mut year = self.year_mut(ctx.company_id, id)?;
        apply(year.value_mut())?;
        info!(company_id = %ctx.company_id, fiscal_year_id = %id, status = %year.status, "{message}");
        Ok(year.clone())
    }
}
