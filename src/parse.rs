//! nom parsers for the `|`-delimited activity files.

use chrono::Duration;
use nom::{
    bytes::complete::{take_till, take_while_m_n},
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, recognize},
    multi::many0,
    sequence::{preceded, separated_pair, tuple},
    IResult,
};
use std::str::FromStr;

use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

pub const DELIMITER: char = '|';

fn number<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, str::parse::<T>)(input)
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// `HH:MM` with any number of hours up to `u32::MAX`.
pub fn hh_mm(input: &str) -> IResult<&str, Duration> {
    map_res(
        separated_pair(number::<u32>, char(':'), number::<u32>),
        |(hours, minutes)| {
            if minutes < 60 {
                Ok(Duration::hours(i64::from(hours)) + Duration::minutes(i64::from(minutes)))
            } else {
                Err("minutes out of range")
            }
        },
    )(input)
}

pub fn date(input: &str) -> IResult<&str, CalendarDate> {
    map_res(
        recognize(tuple((
            take_while_m_n(4, 4, is_digit),
            char('-'),
            take_while_m_n(1, 2, is_digit),
            char('-'),
            take_while_m_n(1, 2, is_digit),
        ))),
        CalendarDate::from_str,
    )(input)
}

fn field(input: &str) -> IResult<&str, &str> {
    take_till(|c| c == DELIMITER)(input)
}

/// Splits a line into its fields, keeping empty ones.
pub fn fields(input: &str) -> IResult<&str, Vec<&str>> {
    let (rest, first) = field(input)?;
    let (rest, mut tail) = many0(preceded(char(DELIMITER), field))(rest)?;
    tail.insert(0, first);
    Ok((rest, tail))
}

/// Parses `HH:MM` into a duration.
pub fn parse_duration(s: &str) -> Result<Duration> {
    all_consuming(hh_mm)(s.trim())
        .map(|(_, duration)| duration)
        .map_err(|_| Error::new(ErrorKind::DurationParse, &format!("'{}' is not HH:MM", s)))
}

/// Like [`parse_duration`] but unreadable values count as no time at all.
pub fn duration_or_zero(s: &str) -> Duration {
    parse_duration(s).unwrap_or_else(|_| Duration::zero())
}

pub fn format_duration(duration: &Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Splits a record line into its date and the remaining fields.
pub fn record(line: &str) -> Result<(CalendarDate, Vec<&str>)> {
    let (_, (date, rest)) = all_consuming(tuple((
        date,
        many0(preceded(char(DELIMITER), field)),
    )))(line.trim_end_matches(&['\r', '\n'][..]))?;
    Ok((date, rest))
}
