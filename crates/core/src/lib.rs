//! tabulon - table structure recovery from positioned page primitives.
//!
//! Input is a [`Page`]: glyphs with bounding boxes and font metrics, and the
//! straight segments drawn on the page. Output is a list of [`Table`]s.

pub mod error;
pub mod geometry;
pub mod index;
pub mod page;
pub mod table;
pub mod text;
pub mod utils;

pub use error::{Result, TableError};
pub use geometry::{Point, Rectangle, Ruling};
pub use page::Page;
pub use table::{
    BasicExtractor, Cell, ExtractionMethod, ExtractionSettings, SpreadsheetExtractor, Table,
    TableEntry, extract_tables,
};
pub use text::{TextChunk, TextDirection, TextElement};
