//! Demo seeder for the OHADA ledger.
//!
//! Seeds one company with the default SYSCOHADA chart and journals, opens a
//! fiscal year, records a month of typical business events through the
//! posting templates and prints the resulting statements as JSON.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use ohada_core::fiscal::NewFiscalYear;
use ohada_core::ledger::{AccountingEntry, CreateEntryInput, LineInput};
use ohada_core::posting::{
    PaymentDirection, PaymentEvent, PaymentMethod, PostingProposal, PostingService,
    PurchaseEvent, SaleEvent, TreasuryAccounts,
};
use ohada_shared::types::{CompanyId, UserId};
use ohada_shared::{AppConfig, CompanyContext};
use ohada_store::LedgerStore;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    let store = LedgerStore::new(&config.ledger);
    let ctx = CompanyContext::new(CompanyId::new(), UserId::new());
    info!(company_id = %ctx.company_id, name = %config.seed.company_name, "Seeding company");

    let accounts = store.accounts.seed_default_chart(&ctx)?;
    let journals = store.journals.seed_default_journals(&ctx)?;
    info!(accounts, journals, "Chart and journals seeded");

    let year = config.seed.fiscal_year;
    let fiscal_year = store.fiscal.create(&ctx, NewFiscalYear::calendar(year))?;
    store.fiscal.open(&ctx, fiscal_year.id)?;

    let currency = config.ledger.currency;
    let on = |month, day| {
        NaiveDate::from_ymd_opt(year, month, day)
            .with_context(|| format!("Invalid demo date {year}-{month}-{day}"))
    };

    let capital = CreateEntryInput::new(
        "OD",
        on(1, 2)?,
        "Apport en capital",
        vec![
            LineInput::debit("521", Decimal::from(5_000_000)),
            LineInput::credit("101", Decimal::from(5_000_000)),
        ],
    )
    .with_currency(currency);
    store.entries.record(&ctx, capital)?;

    let treasury = TreasuryAccounts::default();
    let proposals = [
        PostingService::sale(&SaleEvent {
            reference: "FAC-0001".into(),
            date: on(1, 10)?,
            customer: "Kone Distribution".into(),
            amount_ht: Decimal::from(850_000),
            tax_rate: Decimal::from(18),
            currency,
        })?,
        PostingService::purchase(&PurchaseEvent {
            reference: "FRN-0001".into(),
            date: on(1, 12)?,
            supplier: "Sotra Import".into(),
            amount_ht: Decimal::from(400_000),
            tax_rate: Decimal::from(18),
            currency,
        })?,
        PostingService::payment(
            &PaymentEvent {
                reference: "REC-0001".into(),
                date: on(1, 25)?,
                counterparty: "Kone Distribution".into(),
                amount: Decimal::from(1_003_000),
                method: PaymentMethod::MobileMoney,
                direction: PaymentDirection::CustomerReceipt,
                currency,
            },
            &treasury,
        )?,
        PostingService::payment(
            &PaymentEvent {
                reference: "PAI-0001".into(),
                date: on(1, 28)?,
                counterparty: "Sotra Import".into(),
                amount: Decimal::from(472_000),
                method: PaymentMethod::Transfer,
                direction: PaymentDirection::SupplierPayment,
                currency,
            },
            &treasury,
        )?,
    ];

    for proposal in proposals {
        let entry = record(&store, &ctx, proposal)?;
        info!(number = %entry.number, label = %entry.label, total = %entry.total_debit, "Recorded");
    }

    store.fiscal.close_period(&ctx, fiscal_year.id, 1)?;

    let (start, end) = (fiscal_year.start_date, fiscal_year.end_date);
    let trial_balance = store.reports.trial_balance(ctx.company_id, start, end)?;
    let balance_sheet = store.reports.balance_sheet(ctx.company_id, end)?;
    let income_statement = store.reports.income_statement(ctx.company_id, start, end)?;
    let reconciliation = store.reports.verify_balances(ctx.company_id)?;
    info!(checked = reconciliation.checked_accounts, "Cached balances verified");

    let output = serde_json::json!({
        "company": config.seed.company_name,
        "currency": currency,
        "trial_balance": trial_balance,
        "balance_sheet": balance_sheet,
        "income_statement": income_statement,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Records a template proposal in the company's default journal of its type.
fn record(
    store: &LedgerStore,
    ctx: &CompanyContext,
    proposal: PostingProposal,
) -> anyhow::Result<AccountingEntry> {
    let journal = store
        .journals
        .find_default_by_type(ctx.company_id, proposal.journal_type)?;
    let entry = store
        .entries
        .record(ctx, proposal.into_entry_input(journal.code))?;
    Ok(entry)
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.as_str().into());
    let json = config.logging.json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}
