//! Table extraction types and settings.

use std::collections::BTreeMap;

use crate::geometry::{HasRectangle, Point, Rectangle, Ruling, sort_by_reading_order};
use crate::text::TextChunk;

/// Which table structure recovery path to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExtractionMethod {
    /// Grid defined by ruling lines.
    Lattice,
    /// Grid inferred from text alignment.
    Stream,
    /// Lattice when the page looks ruled, stream otherwise.
    #[default]
    Guess,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Lattice => "lattice",
            ExtractionMethod::Stream => "stream",
            ExtractionMethod::Guess => "guess",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractionSettings {
    pub method: ExtractionMethod,
    /// Column boundaries for the stream path. Also stop words from merging across them.
    pub vertical_ruling_positions: Option<Vec<f64>>,
    /// Rulings for the lattice path, replacing the page's own.
    pub rulings: Option<Vec<Ruling>>,
    /// Separate the lines of multi-line cells with `\r`.
    pub use_line_returns: bool,
    /// Restrict extraction to this part of the page.
    pub area: Option<Rectangle>,
}

impl ExtractionSettings {
    pub fn with_method(mut self, method: ExtractionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_vertical_ruling_positions(mut self, positions: Vec<f64>) -> Self {
        self.vertical_ruling_positions = Some(positions);
        self
    }

    pub fn with_rulings(mut self, rulings: Vec<Ruling>) -> Self {
        self.rulings = Some(rulings);
        self
    }

    pub fn with_line_returns(mut self, use_line_returns: bool) -> Self {
        self.use_line_returns = use_line_returns;
        self
    }

    pub fn with_area(mut self, area: Rectangle) -> Self {
        self.area = Some(area);
        self
    }
}

/// A rectangular table cell bounded by rulings, with the words inside it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    rect: Rectangle,
    chunks: Vec<TextChunk>,
    spanning: bool,
    placeholder: bool,
}

impl Cell {
    pub fn new(rect: Rectangle) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    /// Cell between its top-left and bottom-right corners.
    pub fn from_points(top_left: Point, bottom_right: Point) -> Self {
        Self::new(Rectangle::from_corners(
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y,
        ))
    }

    /// An empty stand-in for a grid position covered by a spanning cell.
    pub fn placeholder(rect: Rectangle) -> Self {
        Self {
            rect,
            placeholder: true,
            ..Self::default()
        }
    }

    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    pub fn set_chunks(&mut self, chunks: Vec<TextChunk>) {
        self.chunks = chunks;
    }

    pub fn is_spanning(&self) -> bool {
        self.spanning
    }

    pub fn set_spanning(&mut self, spanning: bool) {
        self.spanning = spanning;
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Words in reading order, trimmed. With `use_line_returns`, a `\r`
    /// separates words that start further down the cell.
    pub fn text(&self, use_line_returns: bool) -> String {
        let mut chunks: Vec<&TextChunk> = self.chunks.iter().collect();
        sort_by_reading_order(&mut chunks);

        let Some(first) = chunks.first() else {
            return String::new();
        };
        let mut out = String::new();
        let mut current_top = first.rectangle().top;
        for chunk in chunks {
            let top = chunk.rectangle().top;
            if use_line_returns && top > current_top {
                out.push('\r');
            }
            out.push_str(&chunk.text());
            current_top = top;
        }
        out.trim().to_string()
    }

    fn absorb(&mut self, other: Cell) {
        self.rect.merge(&other.rect);
        self.chunks.extend(other.chunks);
        self.spanning |= other.spanning;
        self.placeholder &= other.placeholder;
    }
}

impl HasRectangle for Cell {
    fn rectangle(&self) -> Rectangle {
        self.rect
    }
}

/// Content at one grid position of a [`Table`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TableEntry {
    #[default]
    Empty,
    Chunk(TextChunk),
    Cell(Cell),
}

static EMPTY: TableEntry = TableEntry::Empty;

impl TableEntry {
    pub fn is_empty(&self) -> bool {
        matches!(self, TableEntry::Empty)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, TableEntry::Cell(cell) if cell.is_placeholder())
    }

    /// Rectangle covered by the entry, `None` for [`TableEntry::Empty`].
    pub fn bounds(&self) -> Option<Rectangle> {
        match self {
            TableEntry::Empty => None,
            TableEntry::Chunk(chunk) => Some(chunk.rectangle()),
            TableEntry::Cell(cell) => Some(cell.rectangle()),
        }
    }

    pub fn text(&self, use_line_returns: bool) -> String {
        match self {
            TableEntry::Empty => String::new(),
            TableEntry::Chunk(chunk) => chunk.text().trim().to_string(),
            TableEntry::Cell(cell) => cell.text(use_line_returns),
        }
    }

    /// Combine two entries landing on the same position. Real content wins
    /// over placeholders; otherwise words and rectangles are combined.
    pub fn merge(self, other: TableEntry) -> TableEntry {
        match (self, other) {
            (TableEntry::Empty, other) => other,
            (this, TableEntry::Empty) => this,
            (this, other) if other.is_placeholder() => this,
            (this, other) if this.is_placeholder() => other,
            (TableEntry::Chunk(a), TableEntry::Chunk(b)) => TableEntry::Chunk(a.merged(&b)),
            (TableEntry::Cell(mut a), TableEntry::Cell(b)) => {
                a.absorb(b);
                TableEntry::Cell(a)
            }
            (TableEntry::Cell(mut cell), TableEntry::Chunk(chunk))
            | (TableEntry::Chunk(chunk), TableEntry::Cell(mut cell)) => {
                cell.rect.merge(&chunk.rectangle());
                cell.chunks.push(chunk);
                TableEntry::Cell(cell)
            }
        }
    }
}

impl From<TextChunk> for TableEntry {
    fn from(chunk: TextChunk) -> Self {
        TableEntry::Chunk(chunk)
    }
}

impl From<Cell> for TableEntry {
    fn from(cell: Cell) -> Self {
        TableEntry::Cell(cell)
    }
}

/// A sparse grid of entries recovered from one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    cells: BTreeMap<(usize, usize), TableEntry>,
    row_count: usize,
    col_count: usize,
    rect: Option<Rectangle>,
    page_number: usize,
    method: ExtractionMethod,
}

impl Table {
    pub fn new(page_number: usize, method: ExtractionMethod) -> Self {
        Self {
            page_number,
            method,
            ..Self::default()
        }
    }

    /// Place `entry` at `(row, col)`, merging with whatever is already there.
    pub fn add(&mut self, entry: impl Into<TableEntry>, row: usize, col: usize) {
        let entry = entry.into();
        if let Some(bounds) = entry.bounds() {
            self.rect = Some(match self.rect {
                Some(rect) => rect.union(&bounds),
                None => bounds,
            });
        }
        self.row_count = self.row_count.max(row + 1);
        self.col_count = self.col_count.max(col + 1);

        let slot = self.cells.entry((row, col)).or_default();
        *slot = std::mem::take(slot).merge(entry);
    }

    /// Entry at `(row, col)`; [`TableEntry::Empty`] when nothing is there.
    pub fn get(&self, row: usize, col: usize) -> &TableEntry {
        self.cells.get(&(row, col)).unwrap_or(&EMPTY)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn method(&self) -> ExtractionMethod {
        self.method
    }

    /// Union of every inserted entry; the zero rectangle for an empty table.
    pub fn rectangle(&self) -> Rectangle {
        self.rect.unwrap_or_default()
    }

    /// Exactly `row_count` rows of exactly `col_count` entries.
    pub fn rows(&self) -> Vec<Vec<&TableEntry>> {
        (0..self.row_count)
            .map(|row| (0..self.col_count).map(|col| self.get(row, col)).collect())
            .collect()
    }

    /// Exactly `col_count` columns of exactly `row_count` entries.
    pub fn cols(&self) -> Vec<Vec<&TableEntry>> {
        (0..self.col_count)
            .map(|col| (0..self.row_count).map(|row| self.get(row, col)).collect())
            .collect()
    }

    pub fn to_text_grid(&self, use_line_returns: bool) -> Vec<Vec<String>> {
        self.rows()
            .into_iter()
            .map(|row| row.into_iter().map(|e| e.text(use_line_returns)).collect())
            .collect()
    }
}

impl HasRectangle for Table {
    fn rectangle(&self) -> Rectangle {
        Table::rectangle(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextElement;

    fn word(top: f64, left: f64, text: &str) -> TextChunk {
        TextChunk::new(TextElement::new(top, left, 10.0, 10.0, "F1", 10.0, text, 2.5))
    }

    #[test]
    fn empty_table_has_no_rows() {
        let table = Table::new(1, ExtractionMethod::Stream);
        assert!(table.rows().is_empty());
        assert_eq!(table.rectangle(), Rectangle::default());
        assert!(table.get(3, 3).is_empty());
    }

    #[test]
    fn rows_are_rectangular() {
        let mut table = Table::new(1, ExtractionMethod::Stream);
        table.add(word(0.0, 0.0, "a"), 0, 0);
        table.add(word(20.0, 40.0, "b"), 2, 3);
        let rows = table.rows();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 4));
        assert_eq!(table.cols().len(), 4);
        assert!(table.get(1, 1).is_empty());
    }

    #[test]
    fn adding_to_occupied_position_merges() {
        let mut table = Table::new(1, ExtractionMethod::Stream);
        table.add(word(0.0, 20.0, "b"), 0, 0);
        table.add(word(0.0, 0.0, "a"), 0, 0);
        assert_eq!(table.get(0, 0).text(false), "ab");
        assert_eq!(table.rectangle(), Rectangle::new(0.0, 0.0, 30.0, 10.0));
    }

    #[test]
    fn real_cell_replaces_placeholder() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let mut real = Cell::new(rect);
        real.set_chunks(vec![word(0.0, 0.0, "x")]);

        let mut table = Table::new(1, ExtractionMethod::Lattice);
        table.add(Cell::placeholder(rect), 0, 0);
        table.add(real.clone(), 0, 0);
        assert_eq!(table.get(0, 0), &TableEntry::Cell(real.clone()));

        let mut table = Table::new(1, ExtractionMethod::Lattice);
        table.add(real.clone(), 0, 0);
        table.add(Cell::placeholder(rect), 0, 0);
        assert_eq!(table.get(0, 0), &TableEntry::Cell(real));
    }

    #[test]
    fn cell_text_with_line_returns() {
        let mut cell = Cell::new(Rectangle::new(0.0, 0.0, 100.0, 40.0));
        cell.set_chunks(vec![word(20.0, 0.0, "second"), word(0.0, 0.0, "first")]);
        assert_eq!(cell.text(true), "first\rsecond");
        assert_eq!(cell.text(false), "firstsecond");
    }
}
