//! Shared registry state.
//!
//! Every aggregate that can be locked on its own lives in its own map.
//! Operations that touch several aggregates acquire them in this order:
//! fiscal year, chart, journal, entry, balance.

use std::collections::HashMap;

use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use ohada_core::account::ChartOfAccounts;
use ohada_core::fiscal::FiscalYear;
use ohada_core::journal::{Journal, JournalType};
use ohada_core::ledger::{AccountBalance, AccountingEntry, LedgerError};
use ohada_shared::config::LedgerConfig;
use ohada_shared::types::{AccountId, CompanyId, Currency, EntryId, FiscalYearId};

/// Journal key: company and journal code.
pub(crate) type JournalKey = (CompanyId, String);

/// In-memory state behind every repository.
#[derive(Debug)]
pub struct StoreState {
    /// Ledger currency used by statements.
    pub(crate) currency: Currency,
    /// Page size used when a listing gets no explicit page.
    pub(crate) page_size: u32,
    /// One chart per company.
    pub(crate) charts: DashMap<CompanyId, ChartOfAccounts>,
    /// Cached running balances, one map per company.
    pub(crate) balances: DashMap<CompanyId, HashMap<AccountId, AccountBalance>>,
    /// Journals by company and code.
    pub(crate) journals: DashMap<JournalKey, Journal>,
    /// Code of the default journal per company and type.
    pub(crate) default_journals: DashMap<(CompanyId, JournalType), String>,
    /// Fiscal year IDs per company. Locked while a year is created.
    pub(crate) fiscal_index: DashMap<CompanyId, Vec<FiscalYearId>>,
    /// Fiscal years. Entry writers hold a shared guard, period closing an exclusive one.
    pub(crate) fiscal_years: DashMap<FiscalYearId, FiscalYear>,
    /// Entries of every company.
    pub(crate) entries: DashMap<EntryId, AccountingEntry>,
}

impl StoreState {
    /// Creates empty state.
    #[must_use]
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            currency: config.currency,
            page_size: config.page_size,
            charts: DashMap::new(),
            balances: DashMap::new(),
            journals: DashMap::new(),
            default_journals: DashMap::new(),
            fiscal_index: DashMap::new(),
            fiscal_years: DashMap::new(),
            entries: DashMap::new(),
        }
    }

    /// Ledger currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Fiscal year IDs of a company, in creation order.
    pub(crate) fn fiscal_year_ids(&self, company_id: CompanyId) -> Vec<FiscalYearId> {
        self.fiscal_index
            .get(&company_id)
            .map(|ids| ids.value().clone())
            .unwrap_or_default()
    }

    /// Shared guard on the company's fiscal year containing `date`.
    pub(crate) fn year_containing(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<Ref<'_, FiscalYearId, FiscalYear>, LedgerError> {
        for id in self.fiscal_year_ids(company_id) {
            if let Some(year) = self.fiscal_years.get(&id)
                && year.contains_date(date)
            {
                return Ok(year);
            }
        }
        Err(LedgerError::NoFiscalPeriod(date))
    }

    /// Committed and pending entries of one company.
    pub(crate) fn company_entries(&self, company_id: CompanyId) -> Vec<AccountingEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.company_id == company_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}
