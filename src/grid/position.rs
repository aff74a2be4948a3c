use chrono::{Datelike, Duration, NaiveDate};

use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

/// Number of week columns a year grid spans (0..=53).
pub const WEEK_COLUMNS: u8 = 54;
/// Number of weekday rows, Monday first.
pub const WEEKDAY_ROWS: u8 = 7;

/// Grid coordinates of a single day.
///
/// `week` is the (remapped) ISO week number and selects the visual column,
/// `weekday` is the ISO weekday starting with Monday = 0 and selects the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekPosition {
    pub week: u8,
    pub weekday: u8,
}

impl WeekPosition {
    pub fn new(week: u8, weekday: u8) -> Self {
        WeekPosition { week, weekday }
    }
}

/// January days that still belong to last year's week 52/53 go to column 0,
/// December days already in next year's week 1 go to column 53.
pub(crate) fn remap_week(month: u32, iso_week: u32) -> u8 {
    match (month, iso_week) {
        (1, 52) | (1, 53) => 0,
        (12, 1) => 53,
        (_, week) => week as u8,
    }
}

pub fn compute_week_position(date: &CalendarDate) -> WeekPosition {
    WeekPosition {
        week: remap_week(date.month(), date.iso_week()),
        weekday: date.weekday().num_days_from_monday() as u8,
    }
}

/// Iterates over the full Monday-to-Sunday weeks covering one month,
/// including the leading and trailing days of the adjacent months.
pub struct MonthWeeks {
    current: Option<NaiveDate>,
    last: NaiveDate,
}

impl MonthWeeks {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let first = CalendarDate::first_of_month(year, month)?.naive();
        let last = CalendarDate::last_of_month(year, month)?.naive();

        let lead = first.weekday().num_days_from_monday() as i64;
        let trail = 6 - last.weekday().num_days_from_monday() as i64;

        let out_of_range =
            || Error::new(ErrorKind::InvalidDate, &format!("{}-{:02} out of range", year, month));

        Ok(MonthWeeks {
            current: Some(
                first
                    .checked_sub_signed(Duration::days(lead))
                    .ok_or_else(out_of_range)?,
            ),
            last: last
                .checked_add_signed(Duration::days(trail))
                .ok_or_else(out_of_range)?,
        })
    }
}

impl Iterator for MonthWeeks {
    type Item = [CalendarDate; 7];

    fn next(&mut self) -> Option<Self::Item> {
        let mut day = self.current.filter(|start| *start <= self.last)?;

        let mut week = [CalendarDate::from(day); 7];
        for (i, slot) in week.iter_mut().enumerate() {
            *slot = CalendarDate::from(day);
            if i < 6 {
                day = day.succ_opt()?;
            }
        }
        self.current = day.succ_opt();

        Some(week)
    }
}

/// The days of `month` in grid order, with the neighbouring months' days
/// of the partial weeks discarded.
pub fn month_dates(year: i32, month: u32) -> Result<impl Iterator<Item = CalendarDate>> {
    Ok(MonthWeeks::new(year, month)?
        .flat_map(|week| week.to_vec())
        .filter(move |date| date.month() == month && date.year() == year))
}
