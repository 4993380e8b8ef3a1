//! Journals and entry numbering.
//!
//! A journal is an independently numbered log of entries. The counter only
//! moves through [`Journal::advance`], which callers run under the journal's
//! lock so two entries never share a number.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use ohada_shared::types::{CompanyId, JournalId};
use serde::{Deserialize, Serialize};

use crate::account::AccountCode;
use crate::ledger::LedgerError;

/// Kind of journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalType {
    /// Sales journal.
    Sales,
    /// Purchases journal.
    Purchases,
    /// Cash journal.
    Cash,
    /// Bank journal.
    Bank,
    /// Miscellaneous operations journal.
    Operations,
    /// Anything else.
    Miscellaneous,
}

impl std::fmt::Display for JournalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sales => write!(f, "sales"),
            Self::Purchases => write!(f, "purchases"),
            Self::Cash => write!(f, "cash"),
            Self::Bank => write!(f, "bank"),
            Self::Operations => write!(f, "operations"),
            Self::Miscellaneous => write!(f, "miscellaneous"),
        }
    }
}

/// An entry number: `{prefix}-{year}-{month:02}-{sequence:05}`.
///
/// Numbers of one journal order by year, month, then sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryNumber {
    /// Journal prefix.
    pub prefix: String,
    /// Year of the entry date.
    pub year: i32,
    /// Month of the entry date.
    pub month: u32,
    /// Journal counter value.
    pub sequence: u64,
}

impl std::fmt::Display for EntryNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{:02}-{:05}",
            self.prefix, self.year, self.month, self.sequence
        )
    }
}

/// A journal of one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Journal ID.
    pub id: JournalId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Short code, unique per company.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Journal kind.
    pub journal_type: JournalType,
    /// Entry number prefix.
    pub prefix: String,
    /// Last sequence handed out. Only increases.
    pub current_number: u64,
    /// Account debited by default.
    pub default_debit_account: Option<AccountCode>,
    /// Account credited by default.
    pub default_credit_account: Option<AccountCode>,
    /// Default journal for its type.
    pub is_default: bool,
    /// Inactive journals reject new entries.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Journal {
    /// Creates a journal from its input.
    pub fn new(company_id: CompanyId, input: NewJournal) -> Result<Self, LedgerError> {
        if input.code.trim().is_empty() || input.name.trim().is_empty() {
            return Err(LedgerError::EmptyLabel);
        }
        let default_debit_account = input.default_debit_account.map(AccountCode::parse).transpose()?;
        let default_credit_account = input
            .default_credit_account
            .map(AccountCode::parse)
            .transpose()?;
        let now = Utc::now();
        Ok(Self {
            id: JournalId::new(),
            company_id,
            prefix: input.prefix.unwrap_or_else(|| input.code.clone()),
            code: input.code,
            name: input.name,
            journal_type: input.journal_type,
            current_number: 0,
            default_debit_account,
            default_credit_account,
            is_default: input.is_default,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Increments the counter and returns the number for an entry dated `date`.
    pub fn advance(&mut self, date: NaiveDate) -> Result<EntryNumber, LedgerError> {
        if !self.is_active {
            return Err(LedgerError::JournalInactive(self.code.clone()));
        }
        self.current_number += 1;
        self.updated_at = Utc::now();
        Ok(EntryNumber {
            prefix: self.prefix.clone(),
            year: date.year(),
            month: date.month(),
            sequence: self.current_number,
        })
    }
}

/// Input for creating a journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournal {
    /// Short code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Journal kind.
    pub journal_type: JournalType,
    /// Number prefix, the code when absent.
    pub prefix: Option<String>,
    /// Default debit account.
    pub default_debit_account: Option<String>,
    /// Default credit account.
    pub default_credit_account: Option<String>,
    /// Default journal for its type.
    #[serde(default)]
    pub is_default: bool,
}

impl NewJournal {
    /// Creates a non-default journal input.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, journal_type: JournalType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            journal_type,
            prefix: None,
            default_debit_account: None,
            default_credit_account: None,
            is_default: false,
        }
    }

    /// Marks the journal as the default of its type.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Sets the default debit and credit accounts.
    #[must_use]
    pub fn with_accounts(mut self, debit: Option<&str>, credit: Option<&str>) -> Self {
        self.default_debit_account = debit.map(str::to_string);
        self.default_credit_account = credit.map(str::to_string);
        self
    }
}

/// The five journals every company starts with, each default for its type.
#[must_use]
pub fn default_journals() -> Vec<NewJournal> {
    vec![
        NewJournal::new("VT", "Journal des ventes", JournalType::Sales)
            .with_accounts(Some("411"), Some("701"))
            .as_default(),
        NewJournal::new("AC", "Journal des achats", JournalType::Purchases)
            .with_accounts(Some("601"), Some("401"))
            .as_default(),
        NewJournal::new("CA", "Journal de caisse", JournalType::Cash)
            .with_accounts(Some("571"), None)
            .as_default(),
        NewJournal::new("BQ", "Journal de banque", JournalType::Bank)
            .with_accounts(Some("521"), None)
            .as_default(),
        NewJournal::new("OD", "Operations diverses", JournalType::Operations).as_default(),
    ]
}
