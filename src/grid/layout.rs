use super::position::{WeekPosition, WEEKDAY_ROWS, WEEK_COLUMNS};
use super::separator::{GridPoint, SeparatorPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Scales grid units to pixels for a rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    tile_size: u32,
    origin: u32,
}

impl Default for TileLayout {
    fn default() -> Self {
        TileLayout {
            tile_size: 22,
            origin: 1,
        }
    }
}

impl TileLayout {
    pub fn new(tile_size: u32) -> Self {
        TileLayout {
            tile_size: tile_size.max(1),
            ..TileLayout::default()
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Canvas width and height including a one pixel border on each side.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            WEEK_COLUMNS as u32 * self.tile_size + 2 * self.origin,
            WEEKDAY_ROWS as u32 * self.tile_size + 2 * self.origin,
        )
    }

    pub fn scale(&self, point: GridPoint) -> (u32, u32) {
        (
            self.origin + self.tile_size * point.week as u32,
            self.origin + self.tile_size * point.row as u32,
        )
    }

    pub fn tile_rect(&self, position: WeekPosition) -> Rect {
        let (x0, y0) = self.scale(GridPoint::new(position.week, position.weekday));
        Rect {
            x0,
            y0,
            x1: x0 + self.tile_size,
            y1: y0 + self.tile_size,
        }
    }

    pub fn polyline(&self, path: &SeparatorPath) -> Vec<(u32, u32)> {
        path.points().iter().map(|&p| self.scale(p)).collect()
    }

    /// Closed rectangle around one tile, used to mark the selected day.
    pub fn outline(&self, position: WeekPosition) -> [(u32, u32); 5] {
        let r = self.tile_rect(position);
        [(r.x0, r.y0), (r.x1, r.y0), (r.x1, r.y1), (r.x0, r.y1), (r.x0, r.y0)]
    }

    /// Maps a pixel back to the tile underneath it, if any.
    pub fn position_at(&self, x: u32, y: u32) -> Option<WeekPosition> {
        if x < self.origin || y < self.origin {
            return None;
        }
        let week = (x - self.origin) / self.tile_size;
        let weekday = (y - self.origin) / self.tile_size;
        if week < WEEK_COLUMNS as u32 && weekday < WEEKDAY_ROWS as u32 {
            Some(WeekPosition::new(week as u8, weekday as u8))
        } else {
            None
        }
    }
}
