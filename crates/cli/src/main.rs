//! tabulon - Extract tables from page primitive dumps
//!
//! Reads a JSON document of positioned glyphs and ruling lines per page and
//! writes the recovered tables as CSV, TSV or JSON.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tabulon_cli::{
    OutputFormat, extract_document, infer_format, parse_area, parse_columns, parse_document,
    parse_pages, write_tables,
};
use tabulon_core::{ExtractionMethod, ExtractionSettings};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Extract tables from a JSON dump of page glyphs and rulings.
#[derive(Parser, Debug)]
#[command(name = "tabulon")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the page primitive document, or "-" for stdin
    input: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Force lattice mode (tables drawn with ruling lines)
    #[arg(short = 'l', long, action = ArgAction::SetTrue, conflicts_with = "stream")]
    lattice: bool,

    /// Force stream mode (tables laid out with whitespace)
    #[arg(short = 't', long, action = ArgAction::SetTrue)]
    stream: bool,

    /// Comma-separated x positions of column boundaries (implies stream)
    #[arg(short = 'c', long, conflicts_with = "lattice")]
    columns: Option<String>,

    /// Portion of the page to analyze: top,left,bottom,right
    #[arg(short = 'a', long)]
    area: Option<String>,

    /// Comma-separated page numbers or ranges to parse (1-indexed)
    #[arg(short = 'p', long)]
    pages: Option<String>,

    /// Separate the lines of multi-line cell text with line returns
    #[arg(short = 'r', long = "line-returns", action = ArgAction::SetTrue)]
    use_line_returns: bool,

    /// Reorder right-to-left cell text into visual order
    #[arg(long = "visual-order", action = ArgAction::SetTrue)]
    visual_order: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn build_settings(args: &Args) -> Result<ExtractionSettings> {
    let method = if args.lattice {
        ExtractionMethod::Lattice
    } else if args.stream {
        ExtractionMethod::Stream
    } else {
        ExtractionMethod::Guess
    };

    let mut settings = ExtractionSettings::default()
        .with_method(method)
        .with_line_returns(args.use_line_returns);
    if let Some(columns) = &args.columns {
        settings = settings.with_vertical_ruling_positions(parse_columns(columns)?);
    }
    if let Some(area) = &args.area {
        settings = settings.with_area(parse_area(area)?);
    }
    Ok(settings)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let settings = build_settings(&args)?;
    let pages = args.pages.as_deref().map(parse_pages).transpose()?;
    let format = args
        .format
        .or_else(|| (args.outfile != "-").then(|| infer_format(&args.outfile)).flatten())
        .unwrap_or_default();

    let document = parse_document(&read_input(&args.input)?)?;
    let tables = extract_document(&document, &settings, pages.as_deref());

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    write_tables(
        &tables,
        format,
        settings.use_line_returns,
        args.visual_order,
        &mut output,
    )?;
    output.flush().context("failed to flush output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_conflict_with_lattice() {
        let err = Args::try_parse_from(["tabulon", "-l", "-c", "10,20", "in.json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn columns_with_stream_are_accepted() {
        let args = Args::try_parse_from(["tabulon", "-t", "-c", "10,20", "in.json"]).unwrap();
        assert_eq!(args.columns.as_deref(), Some("10,20"));
        assert!(args.stream);
    }
}
