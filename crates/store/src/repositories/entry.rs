//! Entry engine: creation, posting, validation and cancellation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dashmap::mapref::one::RefMut;
use ohada_core::account::{AccountCode, ChartOfAccounts, NaturalBalance};
use ohada_core::ledger::{
    AccountBalance, AccountInfo, AccountingEntry, CreateEntryInput, EntryAction, EntryFilter,
    EntryStatus, LedgerError, LedgerService,
};
use ohada_shared::CompanyContext;
use ohada_shared::types::{
    AccountId, CompanyId, EntryId, FiscalYearId, PageRequest, PageResponse,
};
use tracing::{info, warn};

use crate::state::StoreState;

/// Entries per company.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    state: Arc<StoreState>,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }

    /// Validates an entry and stores it as a draft.
    ///
    /// The journal number is assigned inside the commit section, while the
    /// fiscal year's shared guard is held.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A line is malformed, there are fewer than two lines, or the entry is unbalanced
    /// - An account is unknown, inactive or kept in another currency
    /// - The journal is unknown or inactive
    /// - No fiscal period contains the date, or that period is closed
    pub fn create(
        &self,
        ctx: &CompanyContext,
        input: CreateEntryInput,
    ) -> Result<AccountingEntry, LedgerError> {
        let result = self.create_inner(ctx, &input);
        if let Err(err) = &result {
            warn!(
                company_id = %ctx.company_id,
                journal = %input.journal,
                date = %input.date,
                error = %err,
                "Entry rejected"
            );
        }
        result
    }

    fn create_inner(
        &self,
        ctx: &CompanyContext,
        input: &CreateEntryInput,
    ) -> Result<AccountingEntry, LedgerError> {
        let year = self.state.year_containing(ctx.company_id, input.date)?;
        year.ensure_accepts(input.date)?;

        let mut chart = self
            .state
            .charts
            .entry(ctx.company_id)
            .or_insert_with(|| ChartOfAccounts::new(ctx.company_id));
        let (lines, totals) = LedgerService::prepare_entry(input, |code| lookup(&chart, code))?;

        let (journal_id, number) = {
            let mut journal = self
                .state
                .journals
                .get_mut(&(ctx.company_id, input.journal.clone()))
                .ok_or_else(|| LedgerError::JournalNotFound(input.journal.clone()))?;
            (journal.id, journal.advance(input.date)?)
        };

        for line in &lines {
            chart.record_usage(&line.account)?;
        }

        let now = Utc::now();
        let entry = AccountingEntry {
            id: EntryId::new(),
            company_id: ctx.company_id,
            number,
            journal_id,
            journal: input.journal.clone(),
            date: input.date,
            value_date: input.value_date.unwrap_or(input.date),
            label: input.label.clone(),
            reference: input.reference.clone(),
            lines,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            fiscal_year_id: year.id,
            currency: input.currency,
            status: EntryStatus::Draft,
            created_by: ctx.user_id,
            created_at: now,
            posted_by: None,
            posted_at: None,
            validated_by: None,
            validated_at: None,
            cancelled_by: None,
            cancelled_at: None,
            updated_at: now,
            version: 0,
        };
        self.state.entries.insert(entry.id, entry.clone());

        info!(
            company_id = %ctx.company_id,
            entry_id = %entry.id,
            number = %entry.number,
            journal = %entry.journal,
            total = %entry.total_debit,
            "Entry created"
        );
        Ok(entry)
    }

    /// Draft -> Posted, applying the entry to the cached balances.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless draft, `ClosedPeriod` if the
    /// entry's period was closed after creation.
    pub fn post(&self, ctx: &CompanyContext, id: EntryId) -> Result<AccountingEntry, LedgerError> {
        let (fiscal_year_id, date) = self.locate(ctx.company_id, id)?;
        let year = self
            .state
            .fiscal_years
            .get(&fiscal_year_id)
            .ok_or(LedgerError::FiscalYearNotFound(fiscal_year_id))?;
        year.ensure_accepts(date)?;

        let mut entry = self.entry_mut(ctx.company_id, id)?;
        let action = LedgerService::post(entry.status, ctx.user_id)?;
        entry.apply(&action);
        self.apply_balances(ctx.company_id, &entry, false);

        info!(
            company_id = %ctx.company_id,
            entry_id = %id,
            number = %entry.number,
            user_id = %ctx.user_id,
            "Entry posted"
        );
        Ok(entry.clone())
    }

    /// Posted -> Validated. Validated entries never change again.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless posted.
    pub fn validate(&self, ctx: &CompanyContext, id: EntryId) -> Result<AccountingEntry, LedgerError> {
        let mut entry = self.entry_mut(ctx.company_id, id)?;
        let action = LedgerService::validate(entry.status, ctx.user_id)?;
        entry.apply(&action);

        info!(
            company_id = %ctx.company_id,
            entry_id = %id,
            number = %entry.number,
            user_id = %ctx.user_id,
            "Entry validated"
        );
        Ok(entry.clone())
    }

    /// Draft or Posted -> Cancelled. A posted entry's balances are reversed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if validated or cancelled, `ClosedPeriod`
    /// if a posted entry's period is closed.
    pub fn cancel(&self, ctx: &CompanyContext, id: EntryId) -> Result<AccountingEntry, LedgerError> {
        let (fiscal_year_id, date) = self.locate(ctx.company_id, id)?;
        let year = self
            .state
            .fiscal_years
            .get(&fiscal_year_id)
            .ok_or(LedgerError::FiscalYearNotFound(fiscal_year_id))?;

        let mut entry = self.entry_mut(ctx.company_id, id)?;
        let action = LedgerService::cancel(entry.status, ctx.user_id)?;
        let reverses = matches!(
            action,
            EntryAction::Cancel {
                reverses_balances: true,
                ..
            }
        );
        if reverses {
            year.ensure_accepts(date)?;
        }
        entry.apply(&action);
        if reverses {
            self.apply_balances(ctx.company_id, &entry, true);
        }

        info!(
            company_id = %ctx.company_id,
            entry_id = %id,
            number = %entry.number,
            reversed = reverses,
            user_id = %ctx.user_id,
            "Entry cancelled"
        );
        Ok(entry.clone())
    }

    /// Creates an entry and posts it. The draft is cancelled if posting fails.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Self::create`] or [`Self::post`].
    pub fn record(
        &self,
        ctx: &CompanyContext,
        input: CreateEntryInput,
    ) -> Result<AccountingEntry, LedgerError> {
        let draft = self.create(ctx, input)?;
        match self.post(ctx, draft.id) {
            Ok(posted) => Ok(posted),
            Err(err) => {
                if let Err(cancel_err) = self.cancel(ctx, draft.id) {
                    warn!(entry_id = %draft.id, error = %cancel_err, "Draft left behind");
                }
                Err(err)
            }
        }
    }

    /// Gets an entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the company has no such entry.
    pub fn get(&self, company_id: CompanyId, id: EntryId) -> Result<AccountingEntry, LedgerError> {
        self.state
            .entries
            .get(&id)
            .filter(|entry| entry.company_id == company_id)
            .map(|entry| entry.value().clone())
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// Lists entries in `(date, number)` order.
    #[must_use]
    pub fn list(
        &self,
        company_id: CompanyId,
        filter: &EntryFilter,
        page: Option<PageRequest>,
    ) -> PageResponse<AccountingEntry> {
        let mut entries: Vec<AccountingEntry> = self
            .state
            .company_entries(company_id)
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        entries.sort_by(|a, b| (a.date, &a.number).cmp(&(b.date, &b.number)));

        let page = page.unwrap_or_else(|| PageRequest::new(1, self.state.page_size));
        page.paginate(entries)
    }

    fn locate(
        &self,
        company_id: CompanyId,
        id: EntryId,
    ) -> Result<(FiscalYearId, NaiveDate), LedgerError> {
        self.state
            .entries
            .get(&id)
            .filter(|entry| entry.company_id == company_id)
            .map(|entry| (entry.fiscal_year_id, entry.date))
            .ok_or(LedgerError::EntryNotFound(id))
    }

    fn entry_mut(
        &self,
        company_id: CompanyId,
        id: EntryId,
    ) -> Result<RefMut<'_, EntryId, AccountingEntry>, LedgerError> {
        self.state
            .entries
            .get_mut(&id)
            .filter(|entry| entry.company_id == company_id)
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// Applies or reverses every line of `entry` under one lock on the
    /// company's balances.
    fn apply_balances(&self, company_id: CompanyId, entry: &AccountingEntry, reverse: bool) {
        let sides: HashMap<AccountId, NaturalBalance> = entry
            .lines
            .iter()
            .map(|line| (line.account_id, line.account.natural_balance()))
            .collect();

        let mut balances = self.state.balances.entry(company_id).or_default();
        for delta in LedgerService::balance_deltas(entry) {
            let side = sides
                .get(&delta.account_id)
                .copied()
                .unwrap_or(NaturalBalance::Debit);
            let balance = balances
                .entry(delta.account_id)
                .or_insert_with(|| AccountBalance::new(delta.account_id, side));
            if reverse {
                balance.reverse(delta.debit, delta.credit);
            } else {
                balance.apply(delta.debit, delta.credit);
            }
        }
    }
}

fn lookup(chart: &ChartOfAccounts, code: &AccountCode) -> Result<AccountInfo, LedgerError> {
    chart
        .get(code)
        .map(|account| AccountInfo {
            id: account.id,
            code: account.code.clone(),
            is_active: account.is_active,
            currency: account.currency,
        })
        .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
}
