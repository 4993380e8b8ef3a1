//! Repository abstractions for ledger data.
//!
//! Repositories share one [`StoreState`](crate::state::StoreState) and scope
//! every read and write to a company.

pub mod account;
pub mod entry;
pub mod fiscal;
pub mod journal;
pub mod report;

pub use account::AccountRepository;
pub use entry::EntryRepository;
pub use fiscal::FiscalRepository;
pub use journal::JournalRepository;
pub use report::ReportRepository;
