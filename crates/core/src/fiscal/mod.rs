//! Fiscal years and monthly periods.

pub mod period;
pub mod year;

pub use period::{Period, generate_monthly_periods, last_day_of_month};
pub use year::{
    FiscalYear, FiscalYearStatus, MAX_FISCAL_YEAR_DAYS, MIN_FISCAL_YEAR_DAYS, NewFiscalYear,
};
