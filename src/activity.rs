use chrono::Duration;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};
use crate::parse::{self, DELIMITER};

/// One logged workout.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub sport: String,
    pub duration: Duration,
    pub distance: Option<f64>,
    pub intensity: Option<u8>,
    pub description: String,
}

/// Replaces the field delimiter in free text so a record stays one line
/// with a fixed number of fields.
pub fn sanitize(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| match c {
            DELIMITER => '/',
            '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}

fn optional<T: std::str::FromStr>(field: Option<&&str>, what: &str) -> Result<Option<T>> {
    match field.map(|f| f.trim()) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| {
            Error::new(
                ErrorKind::RecordParse,
                &format!("invalid {} '{}'", what, value),
            )
        }),
    }
}

impl Activity {
    pub fn new(sport: &str, duration: Duration) -> Self {
        Activity {
            sport: sanitize(sport),
            duration,
            distance: None,
            intensity: None,
            description: String::new(),
        }
    }

    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn intensity(mut self, intensity: u8) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = sanitize(description);
        self
    }

    /// Builds an activity from `sport|duration|distance|intensity|description`
    /// fields. Missing trailing fields are empty, an unreadable duration
    /// counts as zero.
    pub fn from_fields(fields: &[&str]) -> Result<Self> {
        let sport = fields.first().map(|s| s.trim()).unwrap_or("");
        if sport.is_empty() {
            return Err(Error::new(ErrorKind::RecordParse, "missing sport"));
        }

        let duration = fields
            .get(1)
            .map(|d| parse::duration_or_zero(d))
            .unwrap_or_else(Duration::zero);

        Ok(Activity {
            sport: sport.to_owned(),
            duration,
            distance: optional(fields.get(2), "distance")?,
            intensity: optional(fields.get(3), "intensity")?,
            description: fields.get(4).map(|d| d.trim().to_owned()).unwrap_or_default(),
        })
    }

    pub fn to_fields(&self) -> Vec<String> {
        vec![
            sanitize(&self.sport),
            parse::format_duration(&self.duration),
            self.distance.map(|d| d.to_string()).unwrap_or_default(),
            self.intensity.map(|i| i.to_string()).unwrap_or_default(),
            sanitize(&self.description),
        ]
    }

    /// Fills unset values from a sport's defaults. The duration is left
    /// alone, see [`ActivityDefaults::duration_for`].
    pub fn with_defaults(mut self, defaults: &Activity) -> Self {
        self.distance = self.distance.or(defaults.distance);
        self.intensity = self.intensity.or(defaults.intensity);
        if self.description.is_empty() {
            self.description = defaults.description.clone();
        }
        self
    }
}

/// Per-sport default values, read from a `|`-delimited file whose first
/// line is a header.
#[derive(Debug, Clone, Default)]
pub struct ActivityDefaults {
    by_sport: BTreeMap<String, Activity>,
}

impl ActivityDefaults {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| {
            let msg = format!(
                "{} (in '{}')",
                e.message.as_deref().unwrap_or_default(),
                path.display()
            );
            e.with_msg(&msg)
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut by_sport = BTreeMap::new();

        for line in content.lines().skip(1).filter(|l| !l.trim().is_empty()) {
            let (_, fields) = parse::fields(line)?;
            let activity = Activity::from_fields(&fields)?;
            by_sport.insert(activity.sport.clone(), activity);
        }

        Ok(ActivityDefaults { by_sport })
    }

    pub fn get(&self, sport: &str) -> Option<&Activity> {
        self.by_sport.get(sport)
    }

    pub fn sports(&self) -> impl Iterator<Item = &str> {
        self.by_sport.keys().map(String::as_str)
    }

    /// The given duration, else the sport's default, else zero.
    pub fn duration_for(&self, sport: &str, given: Option<Duration>) -> Duration {
        given
            .or_else(|| self.get(&sanitize(sport)).map(|d| d.duration))
            .unwrap_or_else(Duration::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_round_trip() {
        let activity = Activity::new("run", Duration::minutes(45))
            .distance(8.5)
            .intensity(3)
            .description("hills | intervals");
        assert_eq!(activity.description, "hills / intervals");

        let fields = activity.to_fields();
        assert_eq!(fields, vec!["run", "00:45", "8.5", "3", "hills / intervals"]);

        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        assert_eq!(Activity::from_fields(&refs).unwrap(), activity);
    }

    #[test]
    fn lenient_duration_strict_numbers() {
        let activity = Activity::from_fields(&["swim", "later"]).unwrap();
        assert_eq!(activity.duration, Duration::zero());
        assert_eq!(activity.distance, None);

        assert!(Activity::from_fields(&["swim", "00:30", "far"]).is_err());
        assert!(Activity::from_fields(&["", "00:30"]).is_err());
    }

    #[test]
    fn defaults_fill_missing_values() {
        let defaults = ActivityDefaults::parse(
            "sport|duration|distance|intensity|description\n\
             run|00:30|5|3|easy\n\
             bike|01:00|25|2|\n",
        )
        .unwrap();
        assert_eq!(defaults.sports().collect::<Vec<_>>(), vec!["bike", "run"]);

        let filled = Activity::new("run", defaults.duration_for("run", None))
            .intensity(5)
            .with_defaults(defaults.get("run").unwrap());
        assert_eq!(filled.duration, Duration::minutes(30));
        assert_eq!(filled.distance, Some(5.0));
        assert_eq!(filled.intensity, Some(5));
        assert_eq!(filled.description, "easy");
    }

    #[test]
    fn explicit_zero_duration_is_kept() {
        let defaults = ActivityDefaults::parse("header\nrun|00:30|5||\n").unwrap();
        assert_eq!(
            defaults.duration_for("run", Some(Duration::zero())),
            Duration::zero()
        );
        assert_eq!(defaults.duration_for("run", None), Duration::minutes(30));
        assert_eq!(defaults.duration_for("swim", None), Duration::zero());

        let kept =
            Activity::new("run", Duration::zero()).with_defaults(defaults.get("run").unwrap());
        assert_eq!(kept.duration, Duration::zero());
        assert_eq!(kept.distance, Some(5.0));
    }
}
