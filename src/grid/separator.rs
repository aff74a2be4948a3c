use super::position::remap_week;
use crate::date::CalendarDate;
use crate::error::Result;

/// A corner between tiles, in (week column, weekday row) units.
///
/// Unlike [`super::WeekPosition`] these address tile edges, so `row` spans
/// 0..=7 and `week` spans 0..=54.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub week: u8,
    pub row: u8,
}

impl GridPoint {
    pub fn new(week: u8, row: u8) -> Self {
        GridPoint { week, row }
    }
}

/// Closed outline around the tiles of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorPath {
    month: u32,
    points: Vec<GridPoint>,
}

impl SeparatorPath {
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }
}

pub fn build_separator_path(year: i32, month: u32) -> Result<SeparatorPath> {
    let first = CalendarDate::first_of_month(year, month)?;
    let last = CalendarDate::last_of_month(year, month)?;

    let first_weekday = first.weekday().num_days_from_monday() as u8;
    let last_weekday = last.weekday().num_days_from_monday() as u8;
    let first_week = remap_week(month, first.iso_week());
    let last_week = remap_week(month, last.iso_week());

    let mut points = Vec::with_capacity(9);

    if first_weekday == 0 {
        points.push(GridPoint::new(first_week, 0));
    } else {
        // step around the partial first week
        points.push(GridPoint::new(first_week + 1, 0));
        points.push(GridPoint::new(first_week + 1, first_weekday));
        points.push(GridPoint::new(first_week, first_weekday));
    }
    points.push(GridPoint::new(first_week, 7));

    if last_weekday == 6 {
        points.push(GridPoint::new(last_week + 1, 7));
    } else {
        points.push(GridPoint::new(last_week, 7));
        points.push(GridPoint::new(last_week, last_weekday + 1));
        points.push(GridPoint::new(last_week + 1, last_weekday + 1));
    }

    points.push(GridPoint::new(last_week + 1, 0));
    points.push(points[0]);

    Ok(SeparatorPath { month, points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(path: &SeparatorPath) -> Vec<(u8, u8)> {
        path.points().iter().map(|p| (p.week, p.row)).collect()
    }

    #[test]
    fn rectangle_when_month_fills_whole_weeks() {
        // February 2021: Monday 1st to Sunday 28th, weeks 5..=8.
        let path = build_separator_path(2021, 2).unwrap();
        assert_eq!(pts(&path), vec![(5, 0), (5, 7), (9, 7), (9, 0), (5, 0)]);
        assert!(path.is_closed());
    }

    #[test]
    fn partial_first_and_last_week() {
        // June 2022: Wednesday 1st (week 22) to Thursday 30th (week 26).
        let path = build_separator_path(2022, 6).unwrap();
        assert_eq!(
            pts(&path),
            vec![
                (23, 0),
                (23, 2),
                (22, 2),
                (22, 7),
                (26, 7),
                (26, 4),
                (27, 4),
                (27, 0),
                (23, 0),
            ]
        );
    }

    #[test]
    fn january_starting_in_previous_iso_year() {
        // January 2023 starts on Sunday in week 52 of 2022.
        let path = build_separator_path(2023, 1).unwrap();
        assert_eq!(pts(&path)[..3], [(1, 0), (1, 6), (0, 6)]);
        assert!(path.is_closed());
    }

    #[test]
    fn december_ending_in_next_iso_year() {
        // December 2018 ends on Monday the 31st, already week 1 of 2019.
        let path = build_separator_path(2018, 12).unwrap();
        let points = pts(&path);
        assert!(points.contains(&(53, 7)));
        assert!(points.contains(&(53, 1)));
        assert!(points.contains(&(54, 1)));
        assert!(points.contains(&(54, 0)));
    }

    #[test]
    fn always_closed_with_bounded_point_count() {
        for year in 1995..=2035 {
            for month in 1..=12 {
                let path = build_separator_path(year, month).unwrap();
                assert!(path.is_closed(), "{}-{} is open", year, month);

                let first = CalendarDate::first_of_month(year, month).unwrap();
                let last = CalendarDate::last_of_month(year, month).unwrap();
                let mut expected = 5;
                if first.weekday().num_days_from_monday() != 0 {
                    expected += 2;
                }
                if last.weekday().num_days_from_monday() != 6 {
                    expected += 2;
                }
                assert_eq!(path.points().len(), expected);
                assert!((5..=9).contains(&path.points().len()));
            }
        }
    }
}
