pub mod activity;
pub mod color;
pub mod config;
pub mod date;
pub mod error;
pub mod grid;
pub mod parse;
pub mod render;
pub mod store;

pub use date::CalendarDate;
pub use error::{Error, ErrorKind, Result};
pub use grid::{CalendarGeometry, CellId, SeparatorPath, WeekPosition};
