//! Posting rule templates for sales, purchases and payments.

pub mod service;
pub mod types;

pub use service::{PostingService, compute_tax};
pub use types::{
    PaymentDirection, PaymentEvent, PaymentMethod, PostingProposal, PurchaseEvent, SaleEvent,
    TreasuryAccounts,
};
