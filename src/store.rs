use chrono::Duration;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::activity::Activity;
use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};
use crate::parse::{self, DELIMITER};

pub const DEFAULT_MAX_ACTIVITIES: usize = 10;

pub fn year_file_name(prefix: &str, year: i32) -> String {
    format!("{}_{}.csv", prefix, year)
}

/// All activities of one year, backed by one `|`-delimited file.
pub struct ActivityLog {
    year: i32,
    path: PathBuf,
    max_per_day: usize,
    days: BTreeMap<CalendarDate, Vec<Activity>>,
}

impl ActivityLog {
    /// Reads the file of `year` in `dir`, creating an empty one if there is
    /// none yet. Unreadable lines are logged and skipped.
    pub fn open(dir: &Path, prefix: &str, year: i32) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(year_file_name(prefix, year));

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        let mut days: BTreeMap<CalendarDate, Vec<Activity>> = BTreeMap::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record = parse::record(&line).and_then(|(date, fields)| {
                if date.year() != year {
                    return Err(Error::new(
                        ErrorKind::RecordParse,
                        &format!("{} does not belong to {}", date, year),
                    ));
                }
                Ok((date, Activity::from_fields(&fields)?))
            });
            match record {
                Ok((date, activity)) => days.entry(date).or_default().push(activity),
                Err(e) => log::warn!("{} (in '{}' line {})", e, path.display(), lineno + 1),
            }
        }

        log::info!(
            "Loaded {} days of activities from '{}'",
            days.len(),
            path.display()
        );

        Ok(ActivityLog {
            year,
            path,
            max_per_day: DEFAULT_MAX_ACTIVITIES,
            days,
        })
    }

    pub fn with_max_per_day(mut self, max: usize) -> Self {
        self.max_per_day = max;
        self
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn activities(&self, date: &CalendarDate) -> &[Activity] {
        self.days.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days that have at least one activity, in date order.
    pub fn days(&self) -> impl Iterator<Item = (&CalendarDate, &[Activity])> {
        self.days.iter().map(|(date, acts)| (date, acts.as_slice()))
    }

    fn check_year(&self, date: &CalendarDate) -> Result<()> {
        if date.year() == self.year {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::NotFound,
                &format!("{} is not part of the {} log", date, self.year),
            ))
        }
    }

    pub fn add(&mut self, date: CalendarDate, activity: Activity) -> Result<()> {
        self.check_year(&date)?;
        let day = self.days.entry(date).or_default();
        if day.len() >= self.max_per_day {
            return Err(Error::new(
                ErrorKind::ActivityLimit,
                &format!("{} already has {} activities", date, day.len()),
            ));
        }
        day.push(activity);
        Ok(())
    }

    /// Removes activity number `number` of a day, counting from 1 as listed.
    pub fn remove(&mut self, date: &CalendarDate, number: usize) -> Result<Activity> {
        let not_found = || {
            Error::new(
                ErrorKind::NotFound,
                &format!("no activity #{} on {}", number, date),
            )
        };
        let index = number.checked_sub(1).ok_or_else(not_found)?;
        let day = self
            .days
            .get_mut(date)
            .filter(|day| index < day.len())
            .ok_or_else(not_found)?;

        let removed = day.remove(index);
        if day.is_empty() {
            self.days.remove(date);
        }
        Ok(removed)
    }

    /// Replaces everything logged on `date`; an empty list clears the day.
    pub fn replace_day(&mut self, date: CalendarDate, activities: Vec<Activity>) -> Result<()> {
        self.check_year(&date)?;
        if activities.len() > self.max_per_day {
            return Err(Error::new(
                ErrorKind::ActivityLimit,
                &format!("{} activities for {}", activities.len(), date),
            ));
        }
        if activities.is_empty() {
            self.days.remove(&date);
        } else {
            self.days.insert(date, activities);
        }
        Ok(())
    }

    /// Sum of the day's durations, saturating at chrono's range.
    pub fn total_duration(&self, date: &CalendarDate) -> Duration {
        self.activities(date).iter().fold(Duration::zero(), |sum, act| {
            sum.checked_add(&act.duration).unwrap_or(sum)
        })
    }

    /// Writes the whole year, sorted by date.
    pub fn save(&self) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for (date, activities) in &self.days {
            for activity in activities {
                let mut line = date.to_string();
                for field in activity.to_fields() {
                    line.push(DELIMITER);
                    line.push_str(&field);
                }
                writeln!(writer, "{}", line)?;
            }
        }
        writer.flush()?;

        log::info!("Saved activities to '{}'", self.path.display());
        Ok(())
    }
}
