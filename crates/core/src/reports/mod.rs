//! Financial report generation.
//!
//! Pure functions over a chart and a snapshot of entries:
//! - Account ledger (grand livre) with running balance
//! - Trial balance (balance generale)
//! - Balance sheet (bilan)
//! - Income statement (compte de resultat)
//! - Balance replay and reconciliation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
