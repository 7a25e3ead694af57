//! Single entry point choosing between lattice and stream extraction.

use tracing::debug;

use crate::page::Page;

use super::spreadsheet::SpreadsheetExtractor;
use super::stream::BasicExtractor;
use super::types::{ExtractionMethod, ExtractionSettings, Table};

/// Extract the tables of `page` according to `settings`.
///
/// An explicit area crops the page first. Explicit rulings force the lattice
/// path and explicit column positions force the stream path; otherwise
/// [`ExtractionMethod::Guess`] picks lattice when the ruled grid agrees with
/// the text layout.
pub fn extract_tables(page: &Page, settings: &ExtractionSettings) -> Vec<Table> {
    let cropped;
    let page = match &settings.area {
        Some(area) => {
            cropped = page.area(area);
            &cropped
        }
        None => page,
    };

    let method = match settings.method {
        ExtractionMethod::Guess if settings.rulings.is_some() => ExtractionMethod::Lattice,
        ExtractionMethod::Guess if settings.vertical_ruling_positions.is_some() => {
            ExtractionMethod::Stream
        }
        ExtractionMethod::Guess => {
            if SpreadsheetExtractor::new().is_tabular(page) {
                ExtractionMethod::Lattice
            } else {
                ExtractionMethod::Stream
            }
        }
        method => method,
    };
    debug!(page = page.number(), method = method.as_str(), "extracting tables");

    match method {
        ExtractionMethod::Lattice => {
            let extractor = SpreadsheetExtractor::new();
            match &settings.rulings {
                Some(rulings) => extractor.extract_with_rulings(page, rulings),
                None => extractor.extract(page),
            }
        }
        _ => {
            let extractor = BasicExtractor::new();
            match &settings.vertical_ruling_positions {
                Some(positions) => extractor.extract_with_columns(page, positions),
                None => extractor.extract(page),
            }
        }
    }
}
