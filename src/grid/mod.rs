//! Year grid geometry: where each day sits, which tile id it has and how
//! the months are outlined.

mod index;
mod layout;
mod position;
mod separator;

pub use index::{build_grid_index, Cell, CellId, GridIndex};
pub use layout::{Rect, TileLayout};
pub use position::{
    compute_week_position, month_dates, MonthWeeks, WeekPosition, WEEKDAY_ROWS, WEEK_COLUMNS,
};
pub use separator::{build_separator_path, GridPoint, SeparatorPath};

use crate::date::CalendarDate;
use crate::error::Result;

/// The index and month outlines of the displayed year.
///
/// Both are built together and replaced together; ids obtained before a
/// [`CalendarGeometry::rebuild`] do not resolve afterwards.
#[derive(Debug, Clone)]
pub struct CalendarGeometry {
    index: GridIndex,
    separators: Vec<SeparatorPath>,
}

impl CalendarGeometry {
    pub fn new(year: i32) -> Result<Self> {
        let index = build_grid_index(year)?;
        let separators = (1..=12)
            .map(|month| build_separator_path(year, month))
            .collect::<Result<Vec<_>>>()?;

        Ok(CalendarGeometry { index, separators })
    }

    pub fn rebuild(&mut self, year: i32) -> Result<()> {
        log::debug!("Rebuilding grid geometry {} -> {}", self.year(), year);
        *self = CalendarGeometry::new(year)?;
        Ok(())
    }

    pub fn year(&self) -> i32 {
        self.index.year()
    }

    pub fn index(&self) -> &GridIndex {
        &self.index
    }

    pub fn cells(&self) -> &[Cell] {
        self.index.cells()
    }

    pub fn separators(&self) -> &[SeparatorPath] {
        &self.separators
    }

    pub fn separator(&self, month: u32) -> Option<&SeparatorPath> {
        self.separators.iter().find(|s| s.month() == month)
    }

    pub fn position(&self, date: &CalendarDate) -> Result<WeekPosition> {
        self.index.cell(date).map(|cell| cell.position)
    }

    pub fn lookup_cell(&self, date: &CalendarDate) -> Result<CellId> {
        self.index.lookup_cell(date)
    }

    pub fn lookup_date(&self, id: CellId) -> Result<CalendarDate> {
        self.index.lookup_date(id)
    }

    pub fn cell_at(&self, position: WeekPosition) -> Result<CellId> {
        self.index.cell_at(position)
    }
}
