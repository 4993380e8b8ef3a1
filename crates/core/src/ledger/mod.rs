//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Accounting entries and their lines
//! - The entry status machine
//! - Balance calculations
//! - Line validation and the balance tolerance
//! - Error types for ledger operations
//! - Ledger service for entry preparation and transitions

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod status;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{AccountBalance, RunningBalance};
pub use entry::{AccountingEntry, EntryFilter, EntryLine, EntryReference};
pub use error::{ErrorKind, LedgerError};
pub use service::{BalanceDelta, LedgerService};
pub use status::{EntryAction, EntryStatus};
pub use types::{AccountInfo, CreateEntryInput, EntryTotals, LineInput};
pub use validation::{BALANCE_TOLERANCE, is_balanced, validate_lines};
