//! Shared plumbing for the `tabulon` command line tool.
//!
//! Input is a JSON dump of positioned page primitives; output is CSV, TSV
//! or JSON tables.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabulon_core::geometry::Point;
use tabulon_core::table::{rulings_from_polyline, rulings_from_rectangle};
use tabulon_core::text::bidi::reorder_text_per_line;
use tabulon_core::{
    ExtractionSettings, Page, Rectangle, Ruling, Table, TextDirection, TextElement,
    extract_tables,
};
use tracing::{debug, info};

/// Output format for extracted tables.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values (default)
    #[default]
    Csv,
    /// Tab-separated values
    Tsv,
    /// JSON array of tables with geometry
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub pages: Vec<PageSpec>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DirectionSpec {
    Ltr,
    Rtl,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlyphSpec {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub font_size: f64,
    #[serde(default)]
    pub width_of_space: f64,
    #[serde(default)]
    pub direction: DirectionSpec,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SegmentSpec {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RectSpec {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub number: usize,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub glyphs: Vec<GlyphSpec>,
    #[serde(default)]
    pub segments: Vec<SegmentSpec>,
    #[serde(default)]
    pub rectangles: Vec<RectSpec>,
    /// Open polylines as lists of `[x, y]` points.
    #[serde(default)]
    pub polylines: Vec<Vec<[f64; 2]>>,
}

impl PageSpec {
    /// Build the engine page: rectangles and polylines contribute their
    /// edges as rulings alongside the plain segments.
    pub fn to_page(&self) -> Page {
        let glyphs = self
            .glyphs
            .iter()
            .map(|g| {
                let direction = match g.direction {
                    DirectionSpec::Ltr => TextDirection::Ltr,
                    DirectionSpec::Rtl => TextDirection::Rtl,
                    DirectionSpec::Unknown => TextDirection::Unknown,
                };
                TextElement::new(
                    g.top,
                    g.left,
                    g.width,
                    g.height,
                    g.font.as_str(),
                    g.font_size,
                    g.text.as_str(),
                    g.width_of_space,
                )
                .with_direction(direction)
            })
            .collect();

        let mut rulings: Vec<Ruling> = self
            .segments
            .iter()
            .map(|s| Ruling::new(Point::new(s.x1, s.y1), Point::new(s.x2, s.y2)))
            .collect();
        for r in &self.rectangles {
            rulings.extend(rulings_from_rectangle(&Rectangle::new(
                r.top, r.left, r.width, r.height,
            )));
        }
        for line in &self.polylines {
            let points: Vec<Point> = line.iter().map(|&[x, y]| Point::new(x, y)).collect();
            rulings.extend(rulings_from_polyline(&points));
        }

        Page::new(
            self.number,
            self.width,
            self.height,
            self.rotation,
            glyphs,
            rulings,
        )
    }
}

/// Infer output format from file extension.
pub fn infer_format(path: &str) -> Option<OutputFormat> {
    let path_lower = path.to_lowercase();
    if path_lower.ends_with(".tsv") {
        Some(OutputFormat::Tsv)
    } else if path_lower.ends_with(".json") {
        Some(OutputFormat::Json)
    } else if path_lower.ends_with(".csv") {
        Some(OutputFormat::Csv)
    } else {
        None
    }
}

pub fn parse_document(json: &str) -> Result<Document> {
    serde_json::from_str(json).context("invalid page primitive document")
}

fn parse_floats(s: &str, what: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<f64>()
                .with_context(|| format!("invalid {what} value: {p:?}"))
        })
        .collect()
}

/// Parse an area given as `top,left,bottom,right`.
pub fn parse_area(s: &str) -> Result<Rectangle> {
    let values = parse_floats(s, "area")?;
    let [top, left, bottom, right] = values[..] else {
        bail!("area needs four values (top,left,bottom,right), got {}", values.len());
    };
    Ok(Rectangle::from_corners(left, top, right, bottom))
}

/// Parse comma-separated column boundaries.
pub fn parse_columns(s: &str) -> Result<Vec<f64>> {
    let columns = parse_floats(s, "column")?;
    if columns.is_empty() {
        bail!("no column positions given");
    }
    Ok(columns)
}

/// Parse comma-separated page numbers (1-indexed) and `a-b` ranges.
pub fn parse_pages(s: &str) -> Result<Vec<usize>> {
    let mut pages = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((from, to)) => {
                let from: usize = from.trim().parse().with_context(|| format!("invalid page range {part:?}"))?;
                let to: usize = to.trim().parse().with_context(|| format!("invalid page range {part:?}"))?;
                if from == 0 || to < from {
                    bail!("invalid page range {part:?}");
                }
                pages.extend(from..=to);
            }
            None => {
                let page: usize = part.parse().with_context(|| format!("invalid page number {part:?}"))?;
                if page == 0 {
                    bail!("page numbers start at 1");
                }
                pages.push(page);
            }
        }
    }
    Ok(pages)
}

/// Extract the tables of every selected page, in page order.
pub fn extract_document(
    document: &Document,
    settings: &ExtractionSettings,
    pages: Option<&[usize]>,
) -> Vec<Table> {
    let mut tables = Vec::new();
    for spec in &document.pages {
        if pages.is_some_and(|wanted| !wanted.contains(&spec.number)) {
            continue;
        }
        let page = spec.to_page();
        let found = extract_tables(&page, settings);
        debug!(page = spec.number, tables = found.len(), "page done");
        tables.extend(found);
    }
    info!(tables = tables.len(), "extraction finished");
    tables
}

#[derive(Debug, Serialize)]
struct JsonTable {
    page: usize,
    extraction_method: &'static str,
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    data: Vec<Vec<String>>,
}

/// Text grid of a table, optionally in visual bidi order.
pub fn table_text(table: &Table, use_line_returns: bool, visual_order: bool) -> Vec<Vec<String>> {
    let mut grid = table.to_text_grid(use_line_returns);
    if visual_order {
        for cell in grid.iter_mut().flatten() {
            *cell = reorder_text_per_line(cell);
        }
    }
    grid
}

/// Write `tables` to `out` in the requested format.
pub fn write_tables<W: Write>(
    tables: &[Table],
    format: OutputFormat,
    use_line_returns: bool,
    visual_order: bool,
    out: W,
) -> Result<()> {
    match format {
        OutputFormat::Csv | OutputFormat::Tsv => {
            let delimiter = if format == OutputFormat::Tsv { b'\t' } else { b',' };
            let mut writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .flexible(true)
                .from_writer(out);
            for table in tables {
                for row in table_text(table, use_line_returns, visual_order) {
                    writer.write_record(&row).context("failed to write row")?;
                }
            }
            writer.flush().context("failed to flush output")?;
        }
        OutputFormat::Json => {
            let json: Vec<JsonTable> = tables
                .iter()
                .map(|table| {
                    let rect = table.rectangle();
                    JsonTable {
                        page: table.page_number(),
                        extraction_method: table.method().as_str(),
                        top: rect.top,
                        left: rect.left,
                        width: rect.width,
                        height: rect.height,
                        data: table_text(table, use_line_returns, visual_order),
                    }
                })
                .collect();
            serde_json::to_writer(out, &json).context("failed to write JSON")?;
        }
    }
    Ok(())
}
