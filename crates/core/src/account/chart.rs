//! A company's chart of accounts.
//!
//! Accounts live in an arena (`Vec`) and refer to their parent and children by
//! index, so hierarchy walks never chase pointers and are bounded by
//! [`MAX_ACCOUNT_DEPTH`].

use std::collections::HashMap;

use chrono::Utc;
use ohada_shared::types::{AccountId, CompanyId};

use super::code::AccountCode;
use super::types::{Account, NewAccount};
use crate::ledger::LedgerError;

/// Deepest level an account code can have.
pub const MAX_ACCOUNT_DEPTH: usize = 7;

#[derive(Debug, Clone)]
struct Node {
    account: Account,
    parent: Option<usize>,
    children: Vec<usize>,
    usage: u64,
}

/// All accounts of one company, indexed by code.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    company_id: CompanyId,
    nodes: Vec<Node>,
    by_code: HashMap<AccountCode, usize>,
}

impl ChartOfAccounts {
    /// Creates an empty chart for a company.
    #[must_use]
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            nodes: Vec::new(),
            by_code: HashMap::new(),
        }
    }

    /// Owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds an account.
    ///
    /// Without an explicit parent, the account is attached to its nearest
    /// existing ancestor, if any. Existing accounts it now sits between move
    /// under it, so insertion order never changes the hierarchy.
    pub fn add(&mut self, input: NewAccount) -> Result<&Account, LedgerError> {
        let code = AccountCode::parse(input.code)?;
        if input.label.trim().is_empty() {
            return Err(LedgerError::EmptyLabel);
        }
        if self.by_code.contains_key(&code) {
            return Err(LedgerError::DuplicateCode(code.to_string()));
        }

        let parent = match input.parent {
            Some(raw) => {
                let parent_code = AccountCode::parse(raw)?;
                let idx = self.index_of(&parent_code)?;
                if !parent_code.is_prefix_of(&code) {
                    return Err(LedgerError::InvalidParent {
                        code: code.to_string(),
                        parent: parent_code.to_string(),
                    });
                }
                Some(idx)
            }
            None => self.nearest_ancestor(&code),
        };

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            company_id: self.company_id,
            account_type: input.account_type.unwrap_or_else(|| code.default_type()),
            parent: parent.map(|idx| self.nodes[idx].account.code.clone()),
            code: code.clone(),
            label: input.label,
            is_auxiliary: input.is_auxiliary,
            is_reconcilable: input.is_reconcilable,
            currency: input.currency,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let idx = self.nodes.len();
        self.nodes.push(Node {
            account,
            parent,
            children: Vec::new(),
            usage: 0,
        });
        if let Some(parent_idx) = parent {
            self.nodes[parent_idx].children.push(idx);
        }
        self.by_code.insert(code, idx);
        self.adopt_descendants(idx);

        Ok(&self.nodes[idx].account)
    }

    /// Looks up an account by code.
    #[must_use]
    pub fn get(&self, code: &AccountCode) -> Option<&Account> {
        self.by_code.get(code).map(|&idx| &self.nodes[idx].account)
    }

    /// Looks up an account by unvalidated code.
    pub fn find(&self, code: &str) -> Result<&Account, LedgerError> {
        let code = AccountCode::parse(code)?;
        let idx = self.index_of(&code)?;
        Ok(&self.nodes[idx].account)
    }

    /// Looks up an account by ID.
    #[must_use]
    pub fn get_by_id(&self, id: AccountId) -> Option<&Account> {
        self.nodes
            .iter()
            .map(|node| &node.account)
            .find(|account| account.id == id)
    }

    /// All accounts ordered by code.
    #[must_use]
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.nodes.iter().map(|node| &node.account).collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// Direct children of an account, ordered by code.
    pub fn children(&self, code: &AccountCode) -> Result<Vec<&Account>, LedgerError> {
        let idx = self.index_of(code)?;
        let mut children: Vec<&Account> = self.nodes[idx]
            .children
            .iter()
            .map(|&child| &self.nodes[child].account)
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(children)
    }

    /// Ancestors of an account, nearest first.
    pub fn ancestors(&self, code: &AccountCode) -> Result<Vec<&Account>, LedgerError> {
        let mut current = self.nodes[self.index_of(code)?].parent;
        let mut ancestors = Vec::new();
        while let Some(idx) = current {
            if ancestors.len() >= MAX_ACCOUNT_DEPTH {
                return Err(LedgerError::Internal(format!(
                    "account hierarchy above {code} exceeds depth {MAX_ACCOUNT_DEPTH}"
                )));
            }
            ancestors.push(&self.nodes[idx].account);
            current = self.nodes[idx].parent;
        }
        Ok(ancestors)
    }

    /// Records that an entry line references the account.
    pub fn record_usage(&mut self, code: &AccountCode) -> Result<(), LedgerError> {
        let idx = self.index_of(code)?;
        self.nodes[idx].usage += 1;
        Ok(())
    }

    /// Number of entry lines referencing the account.
    pub fn usage(&self, code: &AccountCode) -> Result<u64, LedgerError> {
        Ok(self.nodes[self.index_of(code)?].usage)
    }

    /// Deactivates an account that no entry line references.
    pub fn deactivate(&mut self, code: &AccountCode) -> Result<&Account, LedgerError> {
        let idx = self.index_of(code)?;
        let node = &mut self.nodes[idx];
        if node.usage > 0 {
            return Err(LedgerError::AccountInUse(code.to_string()));
        }
        node.account.is_active = false;
        node.account.updated_at = Utc::now();
        Ok(&node.account)
    }

    fn index_of(&self, code: &AccountCode) -> Result<usize, LedgerError> {
        self.by_code
            .get(code)
            .copied()
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
    }

    /// Re-parents every account whose current parent sits above `idx`.
    fn adopt_descendants(&mut self, idx: usize) {
        let code = self.nodes[idx].account.code.clone();
        let depth = code.as_str().len();
        let adopted: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                code.is_prefix_of(&node.account.code)
                    && node
                        .parent
                        .is_none_or(|p| self.nodes[p].account.code.as_str().len() < depth)
            })
            .map(|(child, _)| child)
            .collect();

        let now = Utc::now();
        for child in adopted {
            if let Some(old) = self.nodes[child].parent {
                self.nodes[old].children.retain(|&c| c != child);
            }
            let node = &mut self.nodes[child];
            node.parent = Some(idx);
            node.account.parent = Some(code.clone());
            node.account.updated_at = now;
            self.nodes[idx].children.push(child);
        }
    }

    fn nearest_ancestor(&self, code: &AccountCode) -> Option<usize> {
        let raw = code.as_str();
        (1..raw.len()).rev().find_map(|len| {
            AccountCode::parse(&raw[..len])
                .ok()
                .and_then(|prefix| self.by_code.get(&prefix).copied())
        })
    }
}

/// SYSCOHADA accounts seeded into a new company: every class, the sub-classes
/// in common use, and every account the posting templates reference.
pub const DEFAULT_CHART: &[(&str, &str)] = &[
    ("1", "Comptes de ressources durables"),
    ("10", "Capital"),
    ("101", "Capital social"),
    ("12", "Report a nouveau"),
    ("121", "Report a nouveau crediteur"),
    ("13", "Resultat net de l'exercice"),
    ("131", "Resultat net: benefice"),
    ("139", "Resultat net: perte"),
    ("16", "Emprunts et dettes assimilees"),
    ("162", "Emprunts aupres des etablissements de credit"),
    ("2", "Comptes d'actif immobilise"),
    ("24", "Materiel"),
    ("244", "Materiel et mobilier"),
    ("28", "Amortissements"),
    ("284", "Amortissements du materiel"),
    ("3", "Comptes de stocks"),
    ("31", "Marchandises"),
    ("311", "Marchandises A"),
    ("4", "Comptes de tiers"),
    ("40", "Fournisseurs et comptes rattaches"),
    ("401", "Fournisseurs, dettes en compte"),
    ("41", "Clients et comptes rattaches"),
    ("411", "Clients"),
    ("42", "Personnel"),
    ("422", "Personnel, remunerations dues"),
    ("43", "Organismes sociaux"),
    ("431", "Securite sociale"),
    ("44", "Etat et collectivites publiques"),
    ("441", "Etat, impot sur les benefices"),
    ("443", "Etat, TVA facturee"),
    ("445", "Etat, TVA recuperable"),
    ("47", "Debiteurs et crediteurs divers"),
    ("471", "Debiteurs et crediteurs divers"),
    ("5", "Comptes de tresorerie"),
    ("52", "Banques"),
    ("521", "Banques locales"),
    ("53", "Etablissements financiers et assimiles"),
    ("531", "Monnaie electronique"),
    ("56", "Banques, credits de tresorerie"),
    ("561", "Credits de tresorerie"),
    ("57", "Caisse"),
    ("571", "Caisse siege social"),
    ("6", "Comptes de charges"),
    ("60", "Achats et variations de stocks"),
    ("601", "Achats de marchandises"),
    ("62", "Services exterieurs"),
    ("622", "Locations et charges locatives"),
    ("66", "Charges de personnel"),
    ("661", "Remunerations directes versees au personnel"),
    ("7", "Comptes de produits"),
    ("70", "Ventes"),
    ("701", "Ventes de marchandises"),
    ("706", "Services vendus"),
    ("8", "Comptes des autres charges et des autres produits"),
    ("81", "Valeurs comptables des cessions d'immobilisations"),
    ("82", "Produits des cessions d'immobilisations"),
];

/// Inputs for the default chart, parents before children.
#[must_use]
pub fn default_accounts() -> Vec<NewAccount> {
    DEFAULT_CHART
        .iter()
        .map(|(code, label)| {
            let input = NewAccount::new(*code, *label);
            match *code {
                "411" | "401" | "521" | "531" | "571" => input.reconcilable(),
                _ => input,
            }
        })
        .collect()
}
