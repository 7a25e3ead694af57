//! Stream extraction: tables without ruling lines, with columns inferred
//! from how words line up.

use itertools::Itertools;
use tracing::debug;

use crate::geometry::{HasRectangle, Rectangle, Ruling};
use crate::page::Page;
use crate::text::{Line, WHITE_SPACE_CHARS, group_by_lines, merge_words};
use crate::utils::cmp_f64;

use super::types::{ExtractionMethod, Table};

/// Right edges of the column regions of `lines`, ascending.
///
/// The first line seeds one region per word. Every later word widens each
/// region it horizontally overlaps, or starts a region of its own.
pub fn column_positions(lines: &[Line]) -> Vec<f64> {
    let Some((first, rest)) = lines.split_first() else {
        return Vec::new();
    };

    let mut regions: Vec<Rectangle> = first
        .chunks()
        .iter()
        .filter(|c| !c.is_same_char(&WHITE_SPACE_CHARS))
        .map(HasRectangle::rectangle)
        .collect();

    for line in rest {
        let mut fresh: Vec<Rectangle> = Vec::new();
        for chunk in line
            .chunks()
            .iter()
            .filter(|c| !c.is_same_char(&WHITE_SPACE_CHARS))
        {
            let rect = chunk.rectangle();
            let mut overlapped = false;
            for region in regions.iter_mut() {
                if region.horizontally_overlaps(&rect) {
                    region.merge(&rect);
                    overlapped = true;
                }
            }
            if !overlapped {
                fresh.push(rect);
            }
        }
        regions.extend(fresh);
    }

    regions
        .iter()
        .map(Rectangle::right)
        .sorted_by(|a, b| cmp_f64(*a, *b))
        .collect()
}

/// Recovers tables from text alignment alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicExtractor;

impl BasicExtractor {
    pub fn new() -> Self {
        Self
    }

    /// One table for the whole page, columns inferred from the text.
    pub fn extract(&self, page: &Page) -> Vec<Table> {
        self.extract_impl(page, None)
    }

    /// One table for the whole page, split at the given x positions.
    ///
    /// Words never merge across these positions.
    pub fn extract_with_columns(&self, page: &Page, positions: &[f64]) -> Vec<Table> {
        self.extract_impl(page, Some(positions))
    }

    fn extract_impl(&self, page: &Page, positions: Option<&[f64]>) -> Vec<Table> {
        let mut table = Table::new(page.number(), ExtractionMethod::Stream);
        let glyphs = page.text();
        if glyphs.is_empty() {
            return vec![table];
        }

        let area = page.rectangle();
        let rulings: Vec<Ruling> = positions
            .unwrap_or_default()
            .iter()
            .map(|&x| Ruling::vertical_at(x, area.top, area.bottom()))
            .collect();

        let chunks = merge_words(&glyphs, &rulings);
        let lines = group_by_lines(&chunks);
        let columns = match positions {
            Some(positions) => {
                let mut columns = positions.to_vec();
                columns.sort_by(|a, b| cmp_f64(*a, *b));
                columns
            }
            None => column_positions(&lines),
        };

        for (row, line) in lines.into_iter().enumerate() {
            for chunk in line.into_chunks() {
                if chunk.is_same_char(&WHITE_SPACE_CHARS) {
                    continue;
                }
                let left = chunk.rectangle().left;
                let col = columns
                    .iter()
                    .position(|&boundary| left <= boundary)
                    .unwrap_or(columns.len());
                table.add(chunk, row, col);
            }
        }

        debug!(
            page = page.number(),
            words = chunks.len(),
            rows = table.row_count(),
            cols = table.col_count(),
            "stream extraction"
        );
        vec![table]
    }
}
