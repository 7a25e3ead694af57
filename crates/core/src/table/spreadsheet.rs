//! Lattice extraction: tables whose grid is drawn with ruling lines.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::geometry::{HasRectangle, Rectangle, Ruling, sort_by_reading_order};
use crate::index::SpatialIndex;
use crate::page::Page;
use crate::text::merge_words;
use crate::utils::{feq, sort_tolerant};

use super::edges::process_rulings;
use super::grid::{find_cells, find_spreadsheets_from_cells};
use super::stream::BasicExtractor;
use super::types::{Cell, ExtractionMethod, Table};

/// Lattice and stream grids agree when the ratio of their row and column
/// counts, averaged, falls inside `(MAGIC_HEURISTIC_NUMBER, 1 / MAGIC_HEURISTIC_NUMBER)`.
const MAGIC_HEURISTIC_NUMBER: f64 = 0.65;

/// Recovers tables from ruled grids.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Tables of the page, using the page's own rulings.
    pub fn extract(&self, page: &Page) -> Vec<Table> {
        let rulings = page.rulings();
        self.extract_from(page, &rulings.horizontal, &rulings.vertical)
    }

    /// Tables of the page using `rulings` instead of the page's own.
    pub fn extract_with_rulings(&self, page: &Page, rulings: &[Ruling]) -> Vec<Table> {
        let processed = process_rulings(rulings, None);
        self.extract_from(page, &processed.horizontal, &processed.vertical)
    }

    /// Table regions of the page without extracting their content.
    pub fn detect_table_areas(&self, page: &Page) -> Vec<Rectangle> {
        let rulings = page.rulings();
        let cells: Vec<Rectangle> = find_cells(&rulings.horizontal, &rulings.vertical)
            .iter()
            .map(HasRectangle::rectangle)
            .collect();
        find_spreadsheets_from_cells(&cells)
    }

    /// Whether the ruled grid of the page agrees with the grid inferred from
    /// its text alone.
    pub fn is_tabular(&self, page: &Page) -> bool {
        let Some(bounds) = page.text_bounds() else {
            return false;
        };
        let minimal = page.area(&bounds);

        let Some(lattice) = self.extract(&minimal).into_iter().next() else {
            return false;
        };
        let Some(stream) = BasicExtractor::new().extract(&minimal).into_iter().next() else {
            return false;
        };
        if stream.row_count() == 0 || stream.col_count() == 0 {
            return false;
        }

        let ratio = (lattice.col_count() as f64 / stream.col_count() as f64
            + lattice.row_count() as f64 / stream.row_count() as f64)
            / 2.0;
        trace!(
            ratio,
            lattice_rows = lattice.row_count(),
            lattice_cols = lattice.col_count(),
            stream_rows = stream.row_count(),
            stream_cols = stream.col_count(),
            "tabular heuristic"
        );
        ratio > MAGIC_HEURISTIC_NUMBER && ratio < 1.0 / MAGIC_HEURISTIC_NUMBER
    }

    fn extract_from(&self, page: &Page, horizontals: &[Ruling], verticals: &[Ruling]) -> Vec<Table> {
        let mut cells = find_cells(horizontals, verticals);
        for cell in &mut cells {
            let glyphs = page.text_in(&cell.rectangle());
            cell.set_chunks(merge_words(&glyphs, &[]));
        }

        let cell_rects: Vec<Rectangle> = cells.iter().map(HasRectangle::rectangle).collect();
        let regions = find_spreadsheets_from_cells(&cell_rects);

        let mut tables: Vec<Table> = regions
            .iter()
            .map(|region| {
                let in_region: Vec<Cell> = cells
                    .iter()
                    .filter(|c| c.rectangle().intersects(region))
                    .cloned()
                    .collect();
                table_from_cells(page.number(), region, in_region)
            })
            .collect();
        sort_by_reading_order(&mut tables);

        debug!(
            page = page.number(),
            cells = cells.len(),
            tables = tables.len(),
            "lattice extraction"
        );
        tables
    }
}

/// Number of distinct (within tolerance) values of `values` in `[from, to)`.
fn distinct_in(values: &[f64], from: f64, to: f64) -> usize {
    values
        .iter()
        .filter(|&&v| (v > from || feq(v, from)) && v < to && !feq(v, to))
        .count()
        .max(1)
}

/// Sorted, tolerance-deduplicated values.
fn distinct_sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values
        .into_iter()
        .sorted_by(f64::total_cmp)
        .dedup_by(|a, b| feq(*a, *b))
        .collect()
}

/// Cells grouped into rows by equal top, each row ordered left to right.
fn rows_of_cells(cells: &[&Cell]) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..cells.len()).collect();
    sort_tolerant(&mut order, |&a, &b| {
        let (ra, rb) = (cells[a].rectangle(), cells[b].rectangle());
        if feq(ra.top, rb.top) {
            ra.left.total_cmp(&rb.left)
        } else {
            ra.top.total_cmp(&rb.top)
        }
    });

    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut row_top = f64::NAN;
    for id in order {
        let top = cells[id].rectangle().top;
        if let Some(row) = rows.last_mut().filter(|_| feq(top, row_top)) {
            row.push(id);
        } else {
            row_top = top;
            rows.push(vec![id]);
        }
    }
    rows
}

/// Lay out the cells of one region on a row/column grid.
///
/// Rows are cells sharing a top. Each cell starts after the widest row (in
/// columns) formed by the cells fully to its left and above or level with
/// it, never before the end of the previous cell of its row, and past any
/// position a spanning cell of an earlier row already covers. Spanning cells
/// cover their whole range, the extra positions holding placeholders.
fn table_from_cells(page_number: usize, region: &Rectangle, cells: Vec<Cell>) -> Table {
    let mut table = Table::new(page_number, ExtractionMethod::Lattice);
    if cells.is_empty() {
        return table;
    }

    let tops = distinct_sorted(cells.iter().map(|c| c.rectangle().top));
    let lefts = distinct_sorted(cells.iter().map(|c| c.rectangle().left));
    let spans: Vec<(usize, usize)> = cells
        .iter()
        .map(|c| {
            let r = c.rectangle();
            (
                distinct_in(&tops, r.top, r.bottom()),
                distinct_in(&lefts, r.left, r.right()),
            )
        })
        .collect();

    let index = SpatialIndex::build(&cells);
    let top = region.top.min(index.bounds().top);
    let refs: Vec<&Cell> = cells.iter().collect();

    for (row, ids) in rows_of_cells(&refs).into_iter().enumerate() {
        let mut next_free = 0;
        for id in ids {
            let (row_span, col_span) = spans[id];
            let mut cell = cells[id].clone();
            let rect = cell.rectangle();

            let mut col = start_column(&index, &cells, &spans, top, &rect).max(next_free);
            while table.get(row, col).is_placeholder() {
                col += 1;
            }

            if row_span > 1 || col_span > 1 {
                cell.set_spanning(true);
                for dr in 0..row_span {
                    for dc in 0..col_span {
                        if dr != 0 || dc != 0 {
                            table.add(Cell::placeholder(rect), row + dr, col + dc);
                        }
                    }
                }
            }
            trace!(row, col, row_span, col_span, "placing cell");
            table.add(cell, row, col);
            next_free = col + col_span;
        }
    }
    table
}

/// Widest row, counted in columns, among the cells lying fully inside the
/// strip left of `rect` from `top` down to the bottom of `rect`.
fn start_column(
    index: &SpatialIndex,
    cells: &[Cell],
    spans: &[(usize, usize)],
    top: f64,
    rect: &Rectangle,
) -> usize {
    let bounds = index.bounds();
    let strip = Rectangle::from_corners(bounds.left, top, rect.left, rect.bottom());
    let left_ids = index.contains(&strip);
    let left_cells: Vec<&Cell> = left_ids.iter().map(|&id| &cells[id]).collect();
    rows_of_cells(&left_cells)
        .iter()
        .map(|r| r.iter().map(|&i| spans[left_ids[i]].1).sum::<usize>())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableEntry;

    fn cell(x0: f64, y0: f64, x1: f64, y1: f64) -> Cell {
        Cell::new(Rectangle::from_corners(x0, y0, x1, y1))
    }

    fn region_of(cells: &[Cell]) -> Rectangle {
        Rectangle::bounding_box_of(cells).unwrap()
    }

    #[test]
    fn plain_grid_positions() {
        let cells = vec![
            cell(0.0, 0.0, 10.0, 10.0),
            cell(10.0, 0.0, 20.0, 10.0),
            cell(0.0, 10.0, 10.0, 20.0),
            cell(10.0, 10.0, 20.0, 20.0),
        ];
        let table = table_from_cells(1, &region_of(&cells), cells.clone());
        assert_eq!((table.row_count(), table.col_count()), (2, 2));
        assert_eq!(table.get(1, 1), &TableEntry::Cell(cells[3].clone()));
    }

    #[test]
    fn row_spanning_cell_pushes_next_row_right() {
        // A spans both rows on the left
        let cells = vec![
            cell(0.0, 0.0, 10.0, 20.0),
            cell(10.0, 0.0, 20.0, 10.0),
            cell(10.0, 10.0, 20.0, 20.0),
        ];
        let table = table_from_cells(1, &region_of(&cells), cells.clone());
        assert_eq!((table.row_count(), table.col_count()), (2, 2));
        assert!(matches!(table.get(0, 0), TableEntry::Cell(c) if c.is_spanning()));
        assert!(table.get(1, 0).is_placeholder());
        assert_eq!(table.get(1, 1), &TableEntry::Cell(cells[2].clone()));
    }

    #[test]
    fn row_spanning_cell_in_an_interior_column() {
        let cells = vec![
            cell(0.0, 0.0, 10.0, 10.0),
            cell(10.0, 0.0, 20.0, 20.0),
            cell(20.0, 0.0, 30.0, 10.0),
            cell(0.0, 10.0, 10.0, 20.0),
            cell(20.0, 10.0, 30.0, 20.0),
        ];
        let table = table_from_cells(1, &region_of(&cells), cells.clone());
        assert_eq!((table.row_count(), table.col_count()), (2, 3));
        assert_eq!(table.get(0, 2), &TableEntry::Cell(cells[2].clone()));
        assert_eq!(table.get(1, 0), &TableEntry::Cell(cells[3].clone()));
        assert!(table.get(1, 1).is_placeholder());
        assert_eq!(table.get(1, 2), &TableEntry::Cell(cells[4].clone()));
    }

    #[test]
    fn column_spanning_cell() {
        let cells = vec![
            cell(0.0, 0.0, 20.0, 10.0),
            cell(0.0, 10.0, 10.0, 20.0),
            cell(10.0, 10.0, 20.0, 20.0),
        ];
        let table = table_from_cells(1, &region_of(&cells), cells.clone());
        assert_eq!((table.row_count(), table.col_count()), (2, 2));
        assert!(table.get(0, 1).is_placeholder());
        assert_eq!(table.get(1, 0), &TableEntry::Cell(cells[1].clone()));
        assert_eq!(table.get(1, 1), &TableEntry::Cell(cells[2].clone()));
    }

    #[test]
    fn empty_region_gives_empty_table() {
        let table = table_from_cells(1, &Rectangle::default(), Vec::new());
        assert!(table.is_empty());
    }
}
