//! Account registry.

use std::sync::Arc;

use chrono::NaiveDate;
use ohada_core::account::{
    Account, AccountCode, ChartOfAccounts, NewAccount, default_accounts,
};
use ohada_core::ledger::{AccountBalance, LedgerError};
use ohada_core::reports::ReportService;
use ohada_shared::CompanyContext;
use ohada_shared::types::{CompanyId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::state::StoreState;

/// Chart of accounts per company, with cached balances.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    state: Arc<StoreState>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }

    /// Adds an account to the company's chart.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code is not a SYSCOHADA account number
    /// - The code already exists in the company
    /// - The parent does not exist or is not a prefix of the code
    pub fn create(&self, ctx: &CompanyContext, input: NewAccount) -> Result<Account, LedgerError> {
        let mut chart = self
            .state
            .charts
            .entry(ctx.company_id)
            .or_insert_with(|| ChartOfAccounts::new(ctx.company_id));
        let account = chart.add(input)?.clone();

        info!(
            company_id = %ctx.company_id,
            code = %account.code,
            account_type = %account.account_type,
            "Account created"
        );
        Ok(account)
    }

    /// Seeds the default SYSCOHADA chart in the ledger currency.
    ///
    /// Accounts the company already has are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if an account of the default chart cannot be added.
    pub fn seed_default_chart(&self, ctx: &CompanyContext) -> Result<usize, LedgerError> {
        let currency = self.state.currency;
        let mut chart = self
            .state
            .charts
            .entry(ctx.company_id)
            .or_insert_with(|| ChartOfAccounts::new(ctx.company_id));

        let mut added = 0;
        for input in default_accounts() {
            if chart.find(&input.code).is_ok() {
                continue;
            }
            chart.add(input.with_currency(currency))?;
            added += 1;
        }

        info!(company_id = %ctx.company_id, added, "Default chart seeded");
        Ok(added)
    }

    /// Deactivates an account no entry references.
    ///
    /// # Errors
    ///
    /// Returns `AccountInUse` if any entry line references the account.
    pub fn deactivate(&self, ctx: &CompanyContext, code: &str) -> Result<Account, LedgerError> {
        let code = AccountCode::parse(code)?;
        let mut chart = self
            .state
            .charts
            .get_mut(&ctx.company_id)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;

        match chart.deactivate(&code) {
            Ok(account) => {
                info!(company_id = %ctx.company_id, code = %code, "Account deactivated");
                Ok(account.clone())
            }
            Err(err) => {
                warn!(company_id = %ctx.company_id, code = %code, error = %err, "Deactivation rejected");
                Err(err)
            }
        }
    }

    /// Gets an account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the company has no such account.
    pub fn get(&self, company_id: CompanyId, code: &str) -> Result<Account, LedgerError> {
        self.with_chart(company_id, code, |chart, code| {
            chart.find(code.as_str()).cloned()
        })
    }

    /// Lists accounts in code order.
    #[must_use]
    pub fn list(&self, company_id: CompanyId, page: &PageRequest) -> PageResponse<Account> {
        let accounts = self
            .state
            .charts
            .get(&company_id)
            .map(|chart| chart.accounts().into_iter().cloned().collect())
            .unwrap_or_default();
        page.paginate(accounts)
    }

    /// Direct children of an account, in code order.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the company has no such account.
    pub fn children(&self, company_id: CompanyId, code: &str) -> Result<Vec<Account>, LedgerError> {
        self.with_chart(company_id, code, |chart, code| {
            Ok(chart.children(code)?.into_iter().cloned().collect())
        })
    }

    /// Ancestors of an account, nearest first.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the company has no such account.
    pub fn ancestors(&self, company_id: CompanyId, code: &str) -> Result<Vec<Account>, LedgerError> {
        self.with_chart(company_id, code, |chart, code| {
            Ok(chart.ancestors(code)?.into_iter().cloned().collect())
        })
    }

    /// Cached running balance of an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the company has no such account.
    pub fn get_balance(&self, company_id: CompanyId, code: &str) -> Result<AccountBalance, LedgerError> {
        let account = self.get(company_id, code)?;
        let cached = self
            .state
            .balances
            .get(&company_id)
            .and_then(|balances| balances.get(&account.id).cloned());
        Ok(cached.unwrap_or_else(|| AccountBalance::new(account.id, account.natural_balance())))
    }

    /// Balance of an account at the end of `as_of`, replayed from committed entries.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the company has no such account.
    pub fn balance_as_of(
        &self,
        company_id: CompanyId,
        code: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let account = self.get(company_id, code)?;
        let entries = self.state.company_entries(company_id);
        let balance = ReportService::closing_balances(&entries, self.state.currency, as_of)
            .get(&account.code)
            .copied()
            .unwrap_or_default();

        debug!(company_id = %company_id, code = %account.code, %as_of, %balance, "Balance replayed");
        Ok(balance)
    }

    fn with_chart<T, F>(&self, company_id: CompanyId, code: &str, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&ChartOfAccounts, &AccountCode) -> Result<T, LedgerError>,
    {
        let code = AccountCode::parse(code)?;
        let chart = self
            .state
            .charts
            .get(&company_id)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        f(&chart, &code)
    }
}
