use chrono::Duration;
use serde_with::DeserializeFromStr;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Converts normalised Y'PbPr (y in 0..=1, pb/pr in -0.5..=0.5) to RGB.
    /// Handy for building a palette of equal luminance steps.
    pub fn from_ypbpr(y: f64, pb: f64, pr: f64) -> Self {
        let channel = |v: f64| (v * 255.0).round().max(0.0).min(255.0) as u8;
        Rgb(
            channel(y + pr * 1.402),
            channel(y + pb * -0.344 + pr * -0.714),
            channel(y + pb * 1.772),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::new(ErrorKind::Config, &format!("'{}' is not a #rrggbb colour", s));
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Maps a day's total training time to a tile colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    // threshold in minutes -> colour, never empty
    steps: BTreeMap<i64, Rgb>,
}

impl Default for ColorScale {
    fn default() -> Self {
        let steps = [
            (0, Rgb(0xf2, 0xf2, 0xf2)),
            (1, Rgb(0xc6, 0xe4, 0x8b)),
            (30, Rgb(0x7b, 0xc9, 0x6f)),
            (60, Rgb(0x23, 0x9a, 0x3b)),
            (120, Rgb(0x19, 0x61, 0x27)),
        ];
        ColorScale {
            steps: steps.iter().copied().collect(),
        }
    }
}

impl ColorScale {
    pub fn new<I>(steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Duration, Rgb)>,
    {
        let steps: BTreeMap<i64, Rgb> = steps
            .into_iter()
            .map(|(threshold, color)| (threshold.num_minutes(), color))
            .collect();
        if steps.is_empty() {
            return Err(Error::new(ErrorKind::Config, "colour scale needs at least one step"));
        }
        Ok(ColorScale { steps })
    }

    /// Colour of the largest threshold not above `total`; totals below the
    /// smallest threshold get the smallest threshold's colour.
    pub fn color_for(&self, total: Duration) -> Rgb {
        self.steps
            .range(..=total.num_minutes())
            .next_back()
            .map(|(_, color)| *color)
            .unwrap_or_else(|| self.min_color())
    }

    /// Colour of an empty day.
    pub fn min_color(&self) -> Rgb {
        self.steps
            .values()
            .next()
            .copied()
            .unwrap_or(Rgb(0xf2, 0xf2, 0xf2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let color: Rgb = "#1a2B3c".parse().unwrap();
        assert_eq!(color, Rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_string(), "#1a2b3c");
        assert!("1a2b3c".parse::<Rgb>().is_err());
        assert!("#1a2b3".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn ypbpr_palette() {
        assert_eq!(Rgb::from_ypbpr(1.0, 0.0, 0.0), Rgb(255, 255, 255));
        assert_eq!(Rgb::from_ypbpr(0.0, 0.0, 0.0), Rgb(0, 0, 0));
        // clamped, not wrapped
        assert_eq!(Rgb::from_ypbpr(0.5, 0.5, 0.5).0, 255);
    }

    #[test]
    fn picks_largest_threshold_below_total() {
        let scale = ColorScale::new(vec![
            (Duration::minutes(10), Rgb(1, 1, 1)),
            (Duration::minutes(30), Rgb(2, 2, 2)),
            (Duration::hours(1), Rgb(3, 3, 3)),
        ])
        .unwrap();

        assert_eq!(scale.min_color(), Rgb(1, 1, 1));
        assert_eq!(scale.color_for(Duration::zero()), Rgb(1, 1, 1));
        assert_eq!(scale.color_for(Duration::minutes(29)), Rgb(1, 1, 1));
        assert_eq!(scale.color_for(Duration::minutes(30)), Rgb(2, 2, 2));
        assert_eq!(scale.color_for(Duration::hours(5)), Rgb(3, 3, 3));
    }

    #[test]
    fn empty_scale_is_rejected() {
        assert!(ColorScale::new(Vec::new()).is_err());
        assert_eq!(ColorScale::default().min_color(), Rgb(0xf2, 0xf2, 0xf2));
    }
}
