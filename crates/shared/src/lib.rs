//! Shared types, errors, and configuration for the SYSCOHADA ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list operations
//! - The company/user context every mutating operation runs under
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use context::CompanyContext;
pub use error::{AppError, AppResult};
