//! The calendar month an availability run covers.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

/// A validated (year, month) pair.
///
/// Construction is the only fallible step of an analysis run: once a
/// `MonthPeriod` exists, every day in it can be enumerated without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    first: NaiveDate,
    last: NaiveDate,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::InvalidYear(year))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last = next
            .and_then(|d| d.pred_opt())
            .ok_or(PeriodError::InvalidYear(year))?;

        Ok(Self { first, last })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn num_days(&self) -> usize {
        self.last.day() as usize
    }

    /// Every calendar day of the month, in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let last = self.last;
        self.first.iter_days().take_while(move |d| *d <= last)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.first && day <= self.last
    }
}
