use chrono::{Datelike, Month, NaiveDate, Weekday};
use num_traits::FromPrimitive;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A plain local calendar day. Construction validates the triple, so every
/// value of this type is a real Gregorian date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in `month`, or `None` if the year is out of chrono's range.
pub fn days_of_month(month: &Month, year: i32) -> Option<u32> {
    let number = month.number_from_month();
    let first = NaiveDate::from_ymd_opt(year, number, 1)?;
    let next = if number == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, number + 1, 1)
    }?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("{:04}-{:02}-{:02}", year, month, day),
                )
            })
    }

    pub fn first_of_month(year: i32, month: u32) -> Result<Self> {
        Self::new(year, month, 1)
    }

    pub fn last_of_month(year: i32, month: u32) -> Result<Self> {
        let invalid =
            || Error::new(ErrorKind::InvalidDate, &format!("{:04}-{:02}", year, month));
        let m = Month::from_u32(month).ok_or_else(invalid)?;
        Self::new(year, month, days_of_month(&m, year).ok_or_else(invalid)?)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// ISO-8601 week number, 1..=53. May belong to the neighbouring year.
    pub fn iso_week(&self) -> u32 {
        self.0.iso_week().week()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(CalendarDate)
    }

    /// Moves the date by `years`, clamping Feb 29 to Feb 28 when the target
    /// year has no leap day.
    pub fn roll_year(&self, years: i32) -> Result<Self> {
        let target = self.year() + years;
        if self.month() == 2 && self.day() == 29 && !is_leap_year(target) {
            Self::new(target, 2, 28)
        } else {
            Self::new(target, self.month(), self.day())
        }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(CalendarDate(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}
