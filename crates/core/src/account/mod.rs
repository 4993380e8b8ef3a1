//! Chart of accounts.
//!
//! - Validated account codes and everything derived from them
//! - Account classes, types and natural balances
//! - The per-company account hierarchy

pub mod chart;
pub mod code;
pub mod types;

pub use chart::{ChartOfAccounts, DEFAULT_CHART, MAX_ACCOUNT_DEPTH, default_accounts};
pub use code::AccountCode;
pub use types::{Account, AccountClass, AccountType, NaturalBalance, NewAccount};
