//! Journal registry and entry numbering.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use ohada_core::journal::{EntryNumber, Journal, JournalType, NewJournal, default_journals};
use ohada_core::ledger::LedgerError;
use ohada_shared::CompanyContext;
use ohada_shared::types::CompanyId;
use tracing::{debug, info};

use crate::state::StoreState;

/// Journals per company.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    state: Arc<StoreState>,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }

    /// Creates a journal.
    ///
    /// A default journal takes the default flag from any other journal of
    /// the same type.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateJournalCode` if the company already has the code.
    pub fn create(&self, ctx: &CompanyContext, input: NewJournal) -> Result<Journal, LedgerError> {
        let journal = Journal::new(ctx.company_id, input)?;
        let key = (ctx.company_id, journal.code.clone());

        match self.state.journals.entry(key) {
            Entry::Occupied(_) => return Err(LedgerError::DuplicateJournalCode(journal.code)),
            Entry::Vacant(slot) => {
                slot.insert(journal.clone());
            }
        }

        if journal.is_default {
            let previous = self
                .state
                .default_journals
                .insert((ctx.company_id, journal.journal_type), journal.code.clone());
            if let Some(previous) = previous.filter(|code| *code != journal.code)
                && let Some(mut demoted) = self.state.journals.get_mut(&(ctx.company_id, previous))
            {
                demoted.is_default = false;
                debug!(company_id = %ctx.company_id, journal = %demoted.code, "Default flag cleared");
            }
        }

        info!(
            company_id = %ctx.company_id,
            journal = %journal.code,
            journal_type = %journal.journal_type,
            is_default = journal.is_default,
            "Journal created"
        );
        Ok(journal)
    }

    /// Creates the default journals (VT, AC, CA, BQ, OD) the company lacks.
    ///
    /// # Errors
    ///
    /// Returns an error if a default journal cannot be created.
    pub fn seed_default_journals(&self, ctx: &CompanyContext) -> Result<usize, LedgerError> {
        let mut added = 0;
        for input in default_journals() {
            if self.state.journals.contains_key(&(ctx.company_id, input.code.clone())) {
                continue;
            }
            self.create(ctx, input)?;
            added += 1;
        }
        Ok(added)
    }

    /// Lists a company's journals by code.
    #[must_use]
    pub fn list(&self, company_id: CompanyId) -> Vec<Journal> {
        let mut journals: Vec<Journal> = self
            .state
            .journals
            .iter()
            .filter(|journal| journal.company_id == company_id)
            .map(|journal| journal.value().clone())
            .collect();
        journals.sort_by(|a, b| a.code.cmp(&b.code));
        journals
    }

    /// Gets a journal by code.
    ///
    /// # Errors
    ///
    /// Returns `JournalNotFound` if the company has no such journal.
    pub fn get(&self, company_id: CompanyId, code: &str) -> Result<Journal, LedgerError> {
        self.state
            .journals
            .get(&(company_id, code.to_string()))
            .map(|journal| journal.value().clone())
            .ok_or_else(|| LedgerError::JournalNotFound(code.to_string()))
    }

    /// Hands out the next number of a journal.
    ///
    /// The counter is read, incremented and written under the journal's
    /// lock, so concurrent callers never share a number.
    ///
    /// # Errors
    ///
    /// Returns `JournalNotFound` or `JournalInactive`.
    pub fn next_entry_number(
        &self,
        ctx: &CompanyContext,
        code: &str,
        date: NaiveDate,
    ) -> Result<EntryNumber, LedgerError> {
        let mut journal = self
            .state
            .journals
            .get_mut(&(ctx.company_id, code.to_string()))
            .ok_or_else(|| LedgerError::JournalNotFound(code.to_string()))?;
        journal.advance(date)
    }

    /// Default journal of a type.
    ///
    /// # Errors
    ///
    /// Returns `NoDefaultJournal` if no journal of that type is the default.
    pub fn find_default_by_type(
        &self,
        company_id: CompanyId,
        journal_type: JournalType,
    ) -> Result<Journal, LedgerError> {
        let code = self
            .state
            .default_journals
            .get(&(company_id, journal_type))
            .map(|code| code.value().clone())
            .ok_or(LedgerError::NoDefaultJournal(journal_type))?;
        self.get(company_id, &code)
    }
}
