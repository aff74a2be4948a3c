use derive_more::Display;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use super::position::{compute_week_position, month_dates, WeekPosition};
use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

/// Opaque handle of one materialised tile.
///
/// Ids are random, so an id handed out for a previous year never resolves
/// against a rebuilt index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{}", _0)]
pub struct CellId(Uuid);

impl CellId {
    fn fresh() -> Self {
        CellId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for CellId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(CellId)
            .map_err(|e| Error::new(ErrorKind::NotFound, &format!("malformed cell id '{}': {}", s, e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub id: CellId,
    pub date: CalendarDate,
    pub position: WeekPosition,
}

/// Bijection between the days of one year and their tiles.
#[derive(Debug, Clone)]
pub struct GridIndex {
    year: i32,
    cells: Vec<Cell>,
    by_date: HashMap<CalendarDate, usize>,
    by_id: HashMap<CellId, usize>,
    by_position: HashMap<WeekPosition, usize>,
}

pub fn build_grid_index(year: i32) -> Result<GridIndex> {
    let mut index = GridIndex {
        year,
        cells: Vec::with_capacity(366),
        by_date: HashMap::with_capacity(366),
        by_id: HashMap::with_capacity(366),
        by_position: HashMap::with_capacity(366),
    };

    for month in 1..=12 {
        for date in month_dates(year, month)? {
            index.insert(Cell {
                id: CellId::fresh(),
                date,
                position: compute_week_position(&date),
            });
        }
    }

    log::debug!("Built grid index for {} with {} cells", year, index.len());

    Ok(index)
}

impl GridIndex {
    fn insert(&mut self, cell: Cell) {
        let slot = self.cells.len();
        self.by_date.insert(cell.date, slot);
        self.by_id.insert(cell.id, slot);
        self.by_position.insert(cell.position, slot);
        self.cells.push(cell);
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in date order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, date: &CalendarDate) -> Result<&Cell> {
        self.by_date
            .get(date)
            .map(|&slot| &self.cells[slot])
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    &format!("{} is not in the grid of {}", date, self.year),
                )
            })
    }

    pub fn lookup_cell(&self, date: &CalendarDate) -> Result<CellId> {
        self.cell(date).map(|cell| cell.id)
    }

    pub fn lookup_date(&self, id: CellId) -> Result<CalendarDate> {
        self.by_id
            .get(&id)
            .map(|&slot| self.cells[slot].date)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    &format!("cell {} is not in the grid of {}", id, self.year),
                )
            })
    }

    /// Resolves a hit-tested grid position back to its tile.
    pub fn cell_at(&self, position: WeekPosition) -> Result<CellId> {
        self.by_position
            .get(&position)
            .map(|&slot| self.cells[slot].id)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    &format!(
                        "no day at week {} weekday {} in {}",
                        position.week, position.weekday, self.year
                    ),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn covers_every_day_once() {
        let index = build_grid_index(2024).unwrap();
        assert_eq!(index.len(), 366);
        let index = build_grid_index(2023).unwrap();
        assert_eq!(index.len(), 365);

        let ids: HashSet<_> = index.cells().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 365);
    }

    #[test]
    fn lookups_round_trip() {
        for year in [2018, 2020, 2021, 2024].iter().copied() {
            let index = build_grid_index(year).unwrap();
            for cell in index.cells() {
                let id = index.lookup_cell(&cell.date).unwrap();
                assert_eq!(index.lookup_date(id).unwrap(), cell.date);
                assert_eq!(index.cell_at(cell.position).unwrap(), id);
            }
        }
    }

    #[test]
    fn positions_are_unique_within_a_year() {
        for year in 1990..=2040 {
            let index = build_grid_index(year).unwrap();
            let positions: HashSet<_> = index.cells().iter().map(|c| c.position).collect();
            assert_eq!(positions.len(), index.len(), "duplicate position in {}", year);
        }
    }

    #[test]
    fn foreign_dates_and_cells_are_not_found() {
        let index = build_grid_index(2022).unwrap();
        let other = build_grid_index(2022).unwrap();

        let date = CalendarDate::new(2023, 1, 1).unwrap();
        assert!(index.lookup_cell(&date).unwrap_err().is_not_found());

        let stale = other.cells()[0].id;
        assert!(index.lookup_date(stale).unwrap_err().is_not_found());

        assert!(index.cell_at(WeekPosition::new(0, 0)).unwrap_err().is_not_found());
    }

    #[test]
    fn cell_ids_parse_back() {
        let index = build_grid_index(2022).unwrap();
        let id = index.cells()[42].id;
        let parsed: CellId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-cell".parse::<CellId>().unwrap_err().is_not_found());
    }
}
