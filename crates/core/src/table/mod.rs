//! Table structure recovery.
//!
//! Two paths produce [`Table`]s from a [`Page`](crate::page::Page):
//! - lattice: rulings are cleaned up, their crossings give cells, and
//!   connected cells give table regions ([`SpreadsheetExtractor`]);
//! - stream: words are grouped into lines and columns are inferred from
//!   their alignment ([`BasicExtractor`]).

mod edges;
mod finder;
mod grid;
mod intersections;
mod spreadsheet;
mod stream;
mod types;

pub use edges::{
    ProcessedRulings, collapse_oriented_rulings, crop_rulings_to_area, process_rulings,
    rulings_from_polyline, rulings_from_rectangle, snap_points,
};
pub use finder::extract_tables;
pub use grid::{find_cells, find_spreadsheets_from_cells};
pub use intersections::{Crossing, Intersections, find_intersections};
pub use spreadsheet::SpreadsheetExtractor;
pub use stream::{BasicExtractor, column_positions};
pub use types::{Cell, ExtractionMethod, ExtractionSettings, Table, TableEntry};
