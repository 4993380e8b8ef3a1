//! Shared setup for store integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use ohada_core::fiscal::{FiscalYear, NewFiscalYear};
use ohada_core::ledger::{CreateEntryInput, LineInput};
use ohada_shared::CompanyContext;
use ohada_shared::config::LedgerConfig;
use ohada_shared::types::{CompanyId, Currency, UserId};
use ohada_store::LedgerStore;
use rust_decimal::Decimal;

/// A store with one seeded company and an open 2024 fiscal year.
pub struct TestLedger {
    pub store: LedgerStore,
    pub ctx: CompanyContext,
    pub year: FiscalYear,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn context() -> CompanyContext {
    CompanyContext::new(CompanyId::new(), UserId::new())
}

/// Seeds the default chart and journals and opens the calendar year 2024.
pub fn seed_company(store: &LedgerStore, ctx: &CompanyContext) -> FiscalYear {
    store.accounts.seed_default_chart(ctx).unwrap();
    store.journals.seed_default_journals(ctx).unwrap();
    let year = store.fiscal.create(ctx, NewFiscalYear::calendar(2024)).unwrap();
    store.fiscal.open(ctx, year.id).unwrap()
}

pub fn setup() -> TestLedger {
    setup_in(Currency::default())
}

/// Like [`setup`], with the chart kept in `currency`.
pub fn setup_in(currency: Currency) -> TestLedger {
    let store = LedgerStore::new(&LedgerConfig {
        currency,
        ..LedgerConfig::default()
    });
    let ctx = context();
    let year = seed_company(&store, &ctx);
    TestLedger { store, ctx, year }
}

/// D 411 1180 / C 701 1000 / C 443 180.
pub fn sale_input(on: NaiveDate) -> CreateEntryInput {
    CreateEntryInput::new(
        "VT",
        on,
        "Facture FAC-001",
        vec![
            LineInput::debit("411", Decimal::from(1180)),
            LineInput::credit("701", Decimal::from(1000)),
            LineInput::credit("443", Decimal::from(180)),
        ],
    )
}

/// D `debit` / C `credit` for `amount`, in the OD journal.
pub fn transfer_input(on: NaiveDate, debit: &str, credit: &str, amount: Decimal) -> CreateEntryInput {
    CreateEntryInput::new(
        "OD",
        on,
        format!("{debit} <- {credit}"),
        vec![LineInput::debit(debit, amount), LineInput::credit(credit, amount)],
    )
}
