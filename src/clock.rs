//! Calendar month arithmetic and the "current month" source.
//!
//! Expiry evaluation is measured in whole months relative to the month in
//! which the evaluation runs. The [`Clock`] trait lets the engine be driven by
//! the wall clock in production and by a fixed month in tests.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::error::EngineError;

/// A calendar month: four-digit year and month 1-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMonth`] when `month` is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Returns `year * 12 + month`, the scale expiry windows are measured on.
    #[inline]
    pub const fn total_months(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    /// Parses `MM/YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidYearMonth(s.to_owned());

        let (month, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Source of the current month for expiry evaluation.
pub trait Clock {
    /// Returns the month evaluation should treat as "now".
    fn today(&self) -> YearMonth;
}

impl<F> Clock for F
where
    F: Fn() -> YearMonth,
{
    fn today(&self) -> YearMonth {
        self()
    }
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> YearMonth {
        let now = chrono::Local::now();
        YearMonth {
            year: now.year(),
            month: now.month(),
        }
    }
}

/// A clock stuck on one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub YearMonth);

impl Clock for FixedClock {
    fn today(&self) -> YearMonth {
        self.0
    }
}
