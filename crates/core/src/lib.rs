//! Core business logic for the SYSCOHADA ledger.
//!
//! This crate contains pure business logic with ZERO storage dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `account` - Chart of accounts: codes, classes, natural balances, hierarchy
//! - `journal` - Journals and entry numbering
//! - `fiscal` - Fiscal years and monthly periods
//! - `ledger` - Double-entry bookkeeping: entries, lines, lifecycle
//! - `posting` - Posting rule templates for sales, purchases and payments
//! - `reports` - Account ledgers and financial statements

pub mod account;
pub mod fiscal;
pub mod journal;
pub mod ledger;
pub mod posting;
pub mod reports;
