//! Renderers on top of the grid geometry: an SVG canvas and a coloured
//! terminal view.

use chrono::Month;
use num_traits::FromPrimitive;
use std::fmt::Write;
use termion::color;

use crate::color::{ColorScale, Rgb};
use crate::date::CalendarDate;
use crate::grid::{CalendarGeometry, CellId, Rect, TileLayout, WeekPosition, WEEK_COLUMNS};
use crate::store::ActivityLog;

const BACKGROUND: Rgb = Rgb(0xd9, 0xd9, 0xd9);
const TILE_OUTLINE: Rgb = Rgb(0xd0, 0xd0, 0xd0);
const SEPARATOR: Rgb = Rgb(0, 0, 0);
const SELECTION: Rgb = Rgb(0, 0x80, 0);

const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Drawing surface in pixel coordinates.
pub trait Canvas {
    fn rect(&mut self, id: CellId, date: &CalendarDate, rect: Rect, fill: Rgb);
    fn polyline(&mut self, points: &[(u32, u32)], stroke: Rgb, width: u32);
}

fn tile_color(log: Option<&ActivityLog>, scale: &ColorScale, date: &CalendarDate) -> Rgb {
    match log {
        Some(log) if !log.activities(date).is_empty() => {
            scale.color_for(log.total_duration(date))
        }
        _ => scale.min_color(),
    }
}

/// Draws every tile, the month outlines and, if given, the selected day.
pub fn draw_year<C: Canvas>(
    canvas: &mut C,
    geometry: &CalendarGeometry,
    layout: &TileLayout,
    log: Option<&ActivityLog>,
    scale: &ColorScale,
    selected: Option<&CalendarDate>,
) {
    for cell in geometry.cells() {
        canvas.rect(
            cell.id,
            &cell.date,
            layout.tile_rect(cell.position),
            tile_color(log, scale, &cell.date),
        );
    }

    for separator in geometry.separators() {
        canvas.polyline(&layout.polyline(separator), SEPARATOR, 1);
    }

    if let Some(date) = selected {
        match geometry.position(date) {
            Ok(position) => canvas.polyline(&layout.outline(position), SELECTION, 2),
            Err(e) => log::debug!("Selection not drawn: {}", e),
        }
    }
}

pub struct SvgCanvas {
    body: String,
    width: u32,
    height: u32,
}

impl SvgCanvas {
    pub fn new(layout: &TileLayout) -> Self {
        let (width, height) = layout.canvas_size();
        SvgCanvas {
            body: String::new(),
            width,
            height,
        }
    }

    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\n\
             <rect width=\"{w}\" height=\"{h}\" fill=\"{bg}\"/>\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            bg = BACKGROUND,
            body = self.body
        )
    }
}

impl Canvas for SvgCanvas {
    fn rect(&mut self, id: CellId, date: &CalendarDate, rect: Rect, fill: Rgb) {
        let _ = writeln!(
            self.body,
            "<rect id=\"cell-{}\" data-date=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\"/>",
            id,
            date,
            rect.x0,
            rect.y0,
            rect.x1 - rect.x0,
            rect.y1 - rect.y0,
            fill,
            TILE_OUTLINE
        );
    }

    fn polyline(&mut self, points: &[(u32, u32)], stroke: Rgb, width: u32) {
        let points: Vec<String> = points.iter().map(|(x, y)| format!("{},{}", x, y)).collect();
        let _ = writeln!(
            self.body,
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            points.join(" "),
            stroke,
            width
        );
    }
}

fn month_header(geometry: &CalendarGeometry) -> String {
    let mut header = vec![' '; WEEK_COLUMNS as usize * 2];
    for month in 1..=12 {
        let label = match Month::from_u32(month) {
            Some(m) => &m.name()[..3],
            None => continue,
        };
        let first = match CalendarDate::first_of_month(geometry.year(), month)
            .and_then(|date| geometry.position(&date))
        {
            Ok(position) => position,
            Err(_) => continue,
        };
        // label the first full week of the month
        let week = if first.weekday == 0 { first.week } else { first.week + 1 };
        let start = week as usize * 2;
        if start + 3 <= header.len() {
            for (i, c) in label.chars().enumerate() {
                header[start + i] = c;
            }
        }
    }
    header.into_iter().collect::<String>().trim_end().to_owned()
}

/// Renders the year as rows of coloured two-character tiles.
pub fn terminal_grid(
    geometry: &CalendarGeometry,
    log: Option<&ActivityLog>,
    scale: &ColorScale,
    selected: Option<&CalendarDate>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", geometry.year(), month_header(geometry));

    for (weekday, label) in WEEKDAY_LABELS.iter().enumerate() {
        let _ = write!(out, "{:>4} ", label);
        for week in 0..WEEK_COLUMNS {
            let position = WeekPosition::new(week, weekday as u8);
            let date = match geometry
                .cell_at(position)
                .and_then(|id| geometry.lookup_date(id))
            {
                Ok(date) => date,
                Err(_) => {
                    out.push_str("  ");
                    continue;
                }
            };

            let Rgb(r, g, b) = tile_color(log, scale, &date);
            let mark = if Some(&date) == selected { "<>" } else { "  " };
            let _ = write!(
                out,
                "{}{}{}",
                color::Bg(color::Rgb(r, g, b)),
                mark,
                color::Bg(color::Reset)
            );
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        rects: Vec<(CellId, CalendarDate, Rgb)>,
        lines: Vec<(usize, Rgb)>,
    }

    impl Canvas for Recorder {
        fn rect(&mut self, id: CellId, date: &CalendarDate, _rect: Rect, fill: Rgb) {
            self.rects.push((id, *date, fill));
        }

        fn polyline(&mut self, points: &[(u32, u32)], stroke: Rgb, _width: u32) {
            self.lines.push((points.len(), stroke));
        }
    }

    #[test]
    fn draws_every_tile_and_month() {
        let geometry = CalendarGeometry::new(2024).unwrap();
        let scale = ColorScale::default();
        let mut canvas = Recorder {
            rects: Vec::new(),
            lines: Vec::new(),
        };
        let selected = CalendarDate::new(2024, 3, 1).unwrap();

        draw_year(
            &mut canvas,
            &geometry,
            &TileLayout::default(),
            None,
            &scale,
            Some(&selected),
        );

        assert_eq!(canvas.rects.len(), 366);
        assert!(canvas.rects.iter().all(|(_, _, fill)| *fill == scale.min_color()));
        assert_eq!(canvas.lines.len(), 13);
        assert_eq!(canvas.lines.last(), Some(&(5, SELECTION)));

        let (id, date, _) = canvas.rects[100];
        assert_eq!(geometry.lookup_date(id).unwrap(), date);
    }

    #[test]
    fn colours_days_with_activities() {
        use crate::activity::Activity;
        use chrono::Duration;

        let dir = tempfile::tempdir().unwrap();
        let mut log = ActivityLog::open(dir.path(), "a", 2022).unwrap();
        let day = CalendarDate::new(2022, 8, 8).unwrap();
        log.add(day, Activity::new("run", Duration::minutes(90))).unwrap();

        let geometry = CalendarGeometry::new(2022).unwrap();
        let scale = ColorScale::default();
        let mut canvas = Recorder {
            rects: Vec::new(),
            lines: Vec::new(),
        };
        draw_year(&mut canvas, &geometry, &TileLayout::default(), Some(&log), &scale, None);

        let (_, _, fill) = canvas.rects.iter().find(|(_, d, _)| *d == day).unwrap();
        assert_eq!(*fill, scale.color_for(Duration::minutes(90)));
        assert_eq!(canvas.lines.len(), 12);
    }

    #[test]
    fn svg_document() {
        let geometry = CalendarGeometry::new(2023).unwrap();
        let layout = TileLayout::new(10);
        let mut canvas = SvgCanvas::new(&layout);
        draw_year(&mut canvas, &geometry, &layout, None, &ColorScale::default(), None);
        let svg = canvas.finish();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"542\" height=\"72\""));
        assert_eq!(svg.matches("<rect").count(), 366);
        assert_eq!(svg.matches("<polyline").count(), 12);
        assert!(svg.contains("data-date=\"2023-12-31\""));
    }

    #[test]
    fn terminal_grid_has_a_row_per_weekday() {
        let geometry = CalendarGeometry::new(2021).unwrap();
        let out = terminal_grid(&geometry, None, &ColorScale::default(), None);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("2021"));
        assert!(lines[0].contains("Jan"));
        assert!(lines[0].contains("Dec"));
        assert!(lines[1].trim_start().starts_with("Mo"));
    }
}
