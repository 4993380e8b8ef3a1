//! Posting rule templates.
//!
//! Each template maps one business event onto SYSCOHADA lines. Templates never
//! emit zero lines, and every proposal goes through the same balance check as
//! the entry engine before it is returned.

use ohada_shared::types::{Currency, Money};
use rust_decimal::Decimal;

use super::types::{
    PaymentDirection, PaymentEvent, PaymentMethod, PostingProposal, PurchaseEvent, SaleEvent,
    TreasuryAccounts,
};
use crate::journal::JournalType;
use crate::ledger::{EntryReference, LedgerError, LineInput, validate_lines};

/// Customer receivables.
pub const CUSTOMERS: &str = "411";
/// Supplier payables.
pub const SUPPLIERS: &str = "401";
/// Sales of goods.
pub const SALES: &str = "701";
/// Purchases of goods.
pub const PURCHASES: &str = "601";
/// VAT collected.
pub const VAT_COLLECTED: &str = "443";
/// VAT recoverable.
pub const VAT_RECOVERABLE: &str = "445";

/// Tax on `amount_ht` at `rate_percent`, rounded to the currency's minor units.
#[must_use]
pub fn compute_tax(amount_ht: Decimal, rate_percent: Decimal, currency: Currency) -> Decimal {
    Money::new(amount_ht * rate_percent / Decimal::ONE_HUNDRED, currency)
        .rounded()
        .amount
}

/// Stateless posting templates.
pub struct PostingService;

impl PostingService {
    /// Sale: D 411 (TTC) / C 701 (HT) / C 443 (VAT).
    pub fn sale(event: &SaleEvent) -> Result<PostingProposal, LedgerError> {
        let tax = compute_tax(event.amount_ht, event.tax_rate, event.currency);
        let ttc = event.amount_ht + tax;
        let label = format!("Facture {} - {}", event.reference, event.customer);

        let mut lines = vec![
            LineInput::debit(CUSTOMERS, ttc).with_label(&label),
            LineInput::credit(SALES, event.amount_ht).with_label(&label),
        ];
        if !tax.is_zero() {
            lines.push(LineInput::credit(VAT_COLLECTED, tax).with_label(format!("TVA {label}")));
        }

        Self::propose(
            JournalType::Sales,
            event.date,
            label,
            EntryReference::new(&event.reference, "invoice"),
            event.currency,
            lines,
        )
    }

    /// Purchase: D 601 (HT) / D 445 (VAT) / C 401 (TTC).
    pub fn purchase(event: &PurchaseEvent) -> Result<PostingProposal, LedgerError> {
        let tax = compute_tax(event.amount_ht, event.tax_rate, event.currency);
        let ttc = event.amount_ht + tax;
        let label = format!("Facture {} - {}", event.reference, event.supplier);

        let mut lines = vec![LineInput::debit(PURCHASES, event.amount_ht).with_label(&label)];
        if !tax.is_zero() {
            lines.push(LineInput::debit(VAT_RECOVERABLE, tax).with_label(format!("TVA {label}")));
        }
        lines.push(LineInput::credit(SUPPLIERS, ttc).with_label(&label));

        Self::propose(
            JournalType::Purchases,
            event.date,
            label,
            EntryReference::new(&event.reference, "bill"),
            event.currency,
            lines,
        )
    }

    /// Payment: receipts debit treasury and credit 411; supplier payments
    /// debit 401 and credit treasury.
    pub fn payment(
        event: &PaymentEvent,
        treasury: &TreasuryAccounts,
    ) -> Result<PostingProposal, LedgerError> {
        let treasury_account = treasury.for_method(event.method);
        let (label, lines) = match event.direction {
            PaymentDirection::CustomerReceipt => {
                let label = format!("Reglement {} - {}", event.reference, event.counterparty);
                let lines = vec![
                    LineInput::debit(treasury_account, event.amount).with_label(&label),
                    LineInput::credit(CUSTOMERS, event.amount).with_label(&label),
                ];
                (label, lines)
            }
            PaymentDirection::SupplierPayment => {
                let label = format!("Paiement {} - {}", event.reference, event.counterparty);
                let lines = vec![
                    LineInput::debit(SUPPLIERS, event.amount).with_label(&label),
                    LineInput::credit(treasury_account, event.amount).with_label(&label),
                ];
                (label, lines)
            }
        };

        let journal_type = match event.method {
            PaymentMethod::Cash => JournalType::Cash,
            _ => JournalType::Bank,
        };

        Self::propose(
            journal_type,
            event.date,
            label,
            EntryReference::new(&event.reference, "payment"),
            event.currency,
            lines,
        )
    }

    fn propose(
        journal_type: JournalType,
        date: chrono::NaiveDate,
        label: String,
        reference: EntryReference,
        currency: Currency,
        lines: Vec<LineInput>,
    ) -> Result<PostingProposal, LedgerError> {
        let totals = validate_lines(&lines)?;
        Ok(PostingProposal {
            journal_type,
            date,
            label,
            reference,
            currency,
            lines,
            totals,
        })
    }
}
