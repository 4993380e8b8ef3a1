//! Fiscal years and their lifecycle.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use ohada_shared::types::{CompanyId, FiscalYearId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::{Period, generate_monthly_periods};
use crate::account::AccountCode;
use crate::ledger::LedgerError;

/// Shortest accepted fiscal year, in days, bounds included.
pub const MIN_FISCAL_YEAR_DAYS: i64 = 360;
/// Longest accepted fiscal year, in days, bounds included.
pub const MAX_FISCAL_YEAR_DAYS: i64 = 370;

/// Lifecycle status of a fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalYearStatus {
    /// Being prepared, no entries yet.
    Draft,
    /// Accepting entries in its open periods.
    Open,
    /// Every period closed, closing balances recorded.
    Closed,
    /// Closed and archived.
    Archived,
}

impl FiscalYearStatus {
    /// Allowed `(from, to)` pairs.
    pub const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Draft, Self::Open),
        (Self::Open, Self::Closed),
        (Self::Closed, Self::Archived),
    ];

    /// Returns true if `self -> to` is an allowed transition.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        Self::TRANSITIONS.contains(&(self, to))
    }
}

impl std::fmt::Display for FiscalYearStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// Input for creating a fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFiscalYear {
    /// Reference year.
    pub year: i32,
    /// Display name, `FY{year}` when absent.
    pub name: Option<String>,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Explicit `(start, end)` periods. Monthly periods are generated when absent.
    pub periods: Option<Vec<(NaiveDate, NaiveDate)>>,
}

impl NewFiscalYear {
    /// A fiscal year matching the calendar year.
    #[must_use]
    pub fn calendar(year: i32) -> Self {
        Self {
            year,
            name: None,
            start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
            end_date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MIN),
            periods: None,
        }
    }
}

/// A fiscal year with its periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Fiscal year ID.
    pub id: FiscalYearId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Reference year.
    pub year: i32,
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Lifecycle status.
    pub status: FiscalYearStatus,
    /// Periods, contiguous and covering `[start_date, end_date]`.
    pub periods: Vec<Period>,
    /// Signed balances carried in from the previous year.
    pub opening_balances: BTreeMap<AccountCode, Decimal>,
    /// Signed balances snapshotted at closing.
    pub closing_balances: BTreeMap<AccountCode, Decimal>,
    /// User who closed the year.
    pub closed_by: Option<UserId>,
    /// When the year was closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl FiscalYear {
    /// Builds a draft fiscal year, generating monthly periods when none are given.
    pub fn new(company_id: CompanyId, input: NewFiscalYear) -> Result<Self, LedgerError> {
        if input.end_date <= input.start_date {
            return Err(LedgerError::InvalidFiscalYear("end date must follow start date"));
        }
        let days = (input.end_date - input.start_date).num_days() + 1;
        if !(MIN_FISCAL_YEAR_DAYS..=MAX_FISCAL_YEAR_DAYS).contains(&days) {
            return Err(LedgerError::InvalidFiscalYear(
                "duration must be between 360 and 370 days",
            ));
        }

        let periods = match input.periods {
            Some(ranges) => explicit_periods(&ranges, input.start_date, input.end_date)?,
            None => generate_monthly_periods(input.start_date, input.end_date),
        };

        let now = Utc::now();
        Ok(Self {
            id: FiscalYearId::new(),
            company_id,
            year: input.year,
            name: input.name.unwrap_or_else(|| format!("FY{}", input.year)),
            start_date: input.start_date,
            end_date: input.end_date,
            status: FiscalYearStatus::Draft,
            periods,
            opening_balances: BTreeMap::new(),
            closing_balances: BTreeMap::new(),
            closed_by: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns true if the date falls within the year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the two years share at least one day.
    #[must_use]
    pub fn overlaps(&self, start_date: NaiveDate, end_date: NaiveDate) -> bool {
        self.start_date <= end_date && start_date <= self.end_date
    }

    /// The period containing `date`.
    #[must_use]
    pub fn period_for(&self, date: NaiveDate) -> Option<&Period> {
        self.periods.iter().find(|p| p.contains_date(date))
    }

    /// Period by number.
    pub fn period(&self, number: u32) -> Result<&Period, LedgerError> {
        self.periods
            .iter()
            .find(|p| p.number == number)
            .ok_or(LedgerError::PeriodNotFound(number))
    }

    /// Number of periods still open.
    #[must_use]
    pub fn open_period_count(&self) -> usize {
        self.periods.iter().filter(|p| !p.is_closed).count()
    }

    /// Fails with `ClosedPeriod` unless `date` lies in an open period of an
    /// open year.
    pub fn ensure_accepts(&self, date: NaiveDate) -> Result<&Period, LedgerError> {
        let Some(period) = self.period_for(date) else {
            return Err(LedgerError::NoFiscalPeriod(date));
        };
        if period.is_closed || self.status != FiscalYearStatus::Open {
            return Err(LedgerError::ClosedPeriod(date.format("%Y-%m").to_string()));
        }
        Ok(period)
    }

    /// Draft -> Open.
    pub fn open(&mut self) -> Result<(), LedgerError> {
        self.transition(FiscalYearStatus::Open)
    }

    /// Closes one period. Closed periods never reopen.
    pub fn close_period(&mut self, number: u32, user: UserId) -> Result<&Period, LedgerError> {
        let idx = self
            .periods
            .iter()
            .position(|p| p.number == number)
            .ok_or(LedgerError::PeriodNotFound(number))?;
        if self.status != FiscalYearStatus::Open {
            return Err(LedgerError::invalid_transition(
                format!("{} fiscal year", self.status),
                "closed period",
            ));
        }

        let now = Utc::now();
        let period = &mut self.periods[idx];
        if period.is_closed {
            return Err(LedgerError::PeriodAlreadyClosed(number));
        }
        period.is_closed = true;
        period.closed_by = Some(user);
        period.closed_at = Some(now);
        self.updated_at = now;
        Ok(&self.periods[idx])
    }

    /// Open -> Closed, once every period is closed.
    pub fn close(
        &mut self,
        user: UserId,
        closing_balances: BTreeMap<AccountCode, Decimal>,
    ) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(FiscalYearStatus::Closed) {
            return Err(LedgerError::invalid_transition(
                self.status,
                FiscalYearStatus::Closed,
            ));
        }
        let open = self.open_period_count();
        if open > 0 {
            return Err(LedgerError::OpenPeriodsRemain(open));
        }

        self.transition(FiscalYearStatus::Closed)?;
        self.closing_balances = closing_balances;
        self.closed_by = Some(user);
        self.closed_at = Some(self.updated_at);
        Ok(())
    }

    /// Closed -> Archived.
    pub fn archive(&mut self) -> Result<(), LedgerError> {
        self.transition(FiscalYearStatus::Archived)
    }

    /// Copies the balance-sheet closing balances of `previous` into this
    /// year's opening balances.
    pub fn carry_forward_from(&mut self, previous: &Self) -> Result<(), LedgerError> {
        if !matches!(
            previous.status,
            FiscalYearStatus::Closed | FiscalYearStatus::Archived
        ) {
            return Err(LedgerError::invalid_transition(
                format!("{} fiscal year", previous.status),
                "carried forward",
            ));
        }
        if !matches!(self.status, FiscalYearStatus::Draft | FiscalYearStatus::Open) {
            return Err(LedgerError::invalid_transition(
                format!("{} fiscal year", self.status),
                "opening balances",
            ));
        }
        if self.start_date <= previous.end_date {
            return Err(LedgerError::InvalidFiscalYear(
                "carry forward must target a later fiscal year",
            ));
        }

        self.opening_balances = previous
            .closing_balances
            .iter()
            .filter(|(code, amount)| code.class().is_balance_sheet() && !amount.is_zero())
            .map(|(code, amount)| (code.clone(), *amount))
            .collect();
        self.updated_at = Utc::now();
        Ok(())
    }

    fn transition(&mut self, to: FiscalYearStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(to) {
            return Err(LedgerError::invalid_transition(self.status, to));
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn explicit_periods(
    ranges: &[(NaiveDate, NaiveDate)],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<Period>, LedgerError> {
    let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
        return Err(LedgerError::InvalidFiscalYear("periods must not be empty"));
    };
    if first.0 != start_date || last.1 != end_date {
        return Err(LedgerError::InvalidFiscalYear(
            "periods must start and end with the fiscal year",
        ));
    }
    if ranges.iter().any(|(start, end)| end < start) {
        return Err(LedgerError::InvalidFiscalYear("period ends before it starts"));
    }
    if ranges.windows(2).any(|pair| pair[0].1.succ_opt() != Some(pair[1].0)) {
        return Err(LedgerError::InvalidFiscalYear("periods must be contiguous"));
    }

    Ok(ranges
        .iter()
        .zip(1..)
        .map(|(&(start, end), number)| Period::new(number, start, end))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_year(year: i32) -> FiscalYear {
        let mut fy = FiscalYear::new(CompanyId::new(), NewFiscalYear::calendar(year)).unwrap();
        fy.open().unwrap();
        fy
    }

    fn close_all(fy: &mut FiscalYear) {
        let user = UserId::new();
        for number in 1..=12 {
            fy.close_period(number, user).unwrap();
        }
    }

    #[test]
    fn test_new_generates_twelve_periods() {
        let fy = FiscalYear::new(CompanyId::new(), NewFiscalYear::calendar(2024)).unwrap();
        assert_eq!(fy.status, FiscalYearStatus::Draft);
        assert_eq!(fy.name, "FY2024");
        assert_eq!(fy.periods.len(), 12);
    }

    #[test]
    fn test_duration_bounds() {
        let mut input = NewFiscalYear::calendar(2024);
        input.end_date = date(2024, 6, 30);
        assert!(matches!(
            FiscalYear::new(CompanyId::new(), input),
            Err(LedgerError::InvalidFiscalYear(_))
        ));

        let mut input = NewFiscalYear::calendar(2024);
        input.end_date = date(2025, 1, 4);
        assert!(FiscalYear::new(CompanyId::new(), input).is_ok());

        let mut input = NewFiscalYear::calendar(2024);
        input.end_date = date(2025, 1, 5);
        assert!(FiscalYear::new(CompanyId::new(), input).is_err());
    }

    #[test]
    fn test_explicit_periods_must_tile() {
        let mut input = NewFiscalYear::calendar(2024);
        input.periods = Some(vec![
            (date(2024, 1, 1), date(2024, 6, 30)),
            (date(2024, 7, 2), date(2024, 12, 31)),
        ]);
        assert_eq!(
            FiscalYear::new(CompanyId::new(), input).unwrap_err(),
            LedgerError::InvalidFiscalYear("periods must be contiguous")
        );

        let mut input = NewFiscalYear::calendar(2024);
        input.periods = Some(vec![
            (date(2024, 1, 1), date(2024, 6, 30)),
            (date(2024, 7, 1), date(2024, 12, 31)),
        ]);
        let fy = FiscalYear::new(CompanyId::new(), input).unwrap();
        assert_eq!(fy.periods.len(), 2);
        assert_eq!(fy.periods[1].number, 2);
    }

    #[test]
    fn test_open_only_from_draft() {
        let mut fy = open_year(2024);
        assert!(matches!(
            fy.open(),
            Err(LedgerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_close_period() {
        let mut fy = open_year(2024);
        let user = UserId::new();
        let period = fy.close_period(3, user).unwrap();
        assert!(period.is_closed);
        assert_eq!(period.closed_by, Some(user));

        assert_eq!(
            fy.close_period(3, user).unwrap_err(),
            LedgerError::PeriodAlreadyClosed(3)
        );
        assert_eq!(
            fy.close_period(13, user).unwrap_err(),
            LedgerError::PeriodNotFound(13)
        );
    }

    #[test]
    fn test_close_period_requires_open_year() {
        let mut fy = FiscalYear::new(CompanyId::new(), NewFiscalYear::calendar(2024)).unwrap();
        assert!(matches!(
            fy.close_period(1, UserId::new()),
            Err(LedgerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_ensure_accepts() {
        let mut fy = open_year(2024);
        assert_eq!(fy.ensure_accepts(date(2024, 3, 15)).unwrap().number, 3);
        fy.close_period(3, UserId::new()).unwrap();
        assert_eq!(
            fy.ensure_accepts(date(2024, 3, 15)).unwrap_err(),
            LedgerError::ClosedPeriod("2024-03".into())
        );
        assert_eq!(
            fy.ensure_accepts(date(2025, 1, 1)).unwrap_err(),
            LedgerError::NoFiscalPeriod(date(2025, 1, 1))
        );
    }

    #[test]
    fn test_close_requires_all_periods_closed() {
        let mut fy = open_year(2024);
        let user = UserId::new();
        fy.close_period(1, user).unwrap();
        assert_eq!(
            fy.close(user, BTreeMap::new()).unwrap_err(),
            LedgerError::OpenPeriodsRemain(11)
        );

        for number in 2..=12 {
            fy.close_period(number, user).unwrap();
        }
        fy.close(user, BTreeMap::new()).unwrap();
        assert_eq!(fy.status, FiscalYearStatus::Closed);
        assert_eq!(fy.closed_by, Some(user));
    }

    #[test]
    fn test_close_draft_year_is_invalid_transition() {
        let mut fy = FiscalYear::new(CompanyId::new(), NewFiscalYear::calendar(2024)).unwrap();
        assert!(matches!(
            fy.close(UserId::new(), BTreeMap::new()),
            Err(LedgerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_archive_only_after_close() {
        let mut fy = open_year(2024);
        assert!(fy.archive().is_err());
        close_all(&mut fy);
        fy.close(UserId::new(), BTreeMap::new()).unwrap();
        fy.archive().unwrap();
        assert_eq!(fy.status, FiscalYearStatus::Archived);
    }

    #[test]
    fn test_carry_forward_keeps_balance_sheet_accounts() {
        let mut previous = open_year(2023);
        close_all(&mut previous);
        let closing: BTreeMap<AccountCode, Decimal> = [
            ("411", dec!(1180)),
            ("571", dec!(0)),
            ("701", dec!(1000)),
            ("101", dec!(5000)),
        ]
        .into_iter()
        .map(|(code, amount)| (AccountCode::parse(code).unwrap(), amount))
        .collect();
        previous.close(UserId::new(), closing).unwrap();

        let mut next = FiscalYear::new(CompanyId::new(), NewFiscalYear::calendar(2024)).unwrap();
        next.carry_forward_from(&previous).unwrap();

        let codes: Vec<&str> = next.opening_balances.keys().map(AccountCode::as_str).collect();
        assert_eq!(codes, vec!["101", "411"]);
    }

    #[test]
    fn test_carry_forward_requires_closed_source() {
        let previous = open_year(2023);
        let mut next = FiscalYear::new(CompanyId::new(), NewFiscalYear::calendar(2024)).unwrap();
        assert!(matches!(
            next.carry_forward_from(&previous),
            Err(LedgerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_overlaps() {
        let fy = open_year(2024);
        assert!(fy.overlaps(date(2024, 12, 31), date(2025, 12, 30)));
        assert!(!fy.overlaps(date(2025, 1, 1), date(2025, 12, 31)));
    }

    #[test]
    fn test_transition_table() {
        assert!(FiscalYearStatus::Draft.can_transition_to(FiscalYearStatus::Open));
        assert!(!FiscalYearStatus::Closed.can_transition_to(FiscalYearStatus::Open));
        assert!(!FiscalYearStatus::Archived.can_transition_to(FiscalYearStatus::Closed));
    }
}
