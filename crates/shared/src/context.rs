//! Identity context for ledger operations.
//!
//! Authentication happens outside the ledger; callers hand over the
//! already-authenticated user and the company the request is scoped to.

use serde::{Deserialize, Serialize};

use crate::types::{CompanyId, UserId};

/// The authenticated user acting within one company.
///
/// Every mutating ledger operation takes a context. No operation reads or
/// writes data belonging to a company other than `company_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyContext {
    /// Company (tenant) the operation is scoped to.
    pub company_id: CompanyId,
    /// User performing the operation.
    pub user_id: UserId,
}

impl CompanyContext {
    /// Creates a new context.
    #[must_use]
    pub const fn new(company_id: CompanyId, user_id: UserId) -> Self {
        Self {
            company_id,
            user_id,
        }
    }

    /// Returns the same user acting within another company.
    #[must_use]
    pub const fn with_company(self, company_id: CompanyId) -> Self {
        Self {
            company_id,
            user_id: self.user_id,
        }
    }
}
