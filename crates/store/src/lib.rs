//! Concurrent in-memory registries for the SYSCOHADA ledger.
//!
//! This crate provides:
//! - Shared state behind sharded `dashmap` maps
//! - One repository per aggregate (accounts, journals, fiscal years, entries)
//! - Read-only statement generation over committed entries

pub mod repositories;
pub mod state;

use std::sync::Arc;

use ohada_shared::config::LedgerConfig;

pub use repositories::{
    AccountRepository, EntryRepository, FiscalRepository, JournalRepository, ReportRepository,
};
pub use state::StoreState;

/// Every repository over one shared state.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    /// Chart of accounts and cached balances.
    pub accounts: AccountRepository,
    /// Journals and numbering.
    pub journals: JournalRepository,
    /// Fiscal years and periods.
    pub fiscal: FiscalRepository,
    /// Accounting entries.
    pub entries: EntryRepository,
    /// Statements.
    pub reports: ReportRepository,
}

impl LedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: &LedgerConfig) -> Self {
        let state = Arc::new(StoreState::new(config));
        Self {
            accounts: AccountRepository::new(Arc::clone(&state)),
            journals: JournalRepository::new(Arc::clone(&state)),
            fiscal: FiscalRepository::new(Arc::clone(&state)),
            entries: EntryRepository::new(Arc::clone(&state)),
            reports: ReportRepository::new(state),
        }
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}
