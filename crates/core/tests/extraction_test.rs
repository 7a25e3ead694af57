//! End-to-end extraction through `extract_tables` and the two extractors.

use tabulon_core::geometry::{HasRectangle, Rectangle, Ruling};
use tabulon_core::{
    BasicExtractor, ExtractionMethod, ExtractionSettings, Page, TextElement, extract_tables,
};

fn word(top: f64, left: f64, text: &str) -> Vec<TextElement> {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            TextElement::new(top, left + i as f64 * 5.0, 5.0, 8.0, "Times", 8.0, c.to_string(), 2.0)
        })
        .collect()
}

/// Two aligned columns of words, three rows, no rulings.
fn aligned_page() -> Page {
    let mut glyphs = Vec::new();
    for (row, (left, right)) in [("name", "qty"), ("bolt", "12"), ("nut", "7")]
        .into_iter()
        .enumerate()
    {
        let top = 10.0 + row as f64 * 20.0;
        glyphs.extend(word(top, 10.0, left));
        glyphs.extend(word(top, 80.0, right));
    }
    Page::new(3, 200.0, 200.0, 0, glyphs, Vec::new())
}

/// A 2 x 2 ruled grid with one word per cell, a caption line above it and
/// a footnote below it.
fn ruled_page() -> Page {
    let rulings = vec![
        Ruling::horizontal_at(20.0, 20.0, 120.0),
        Ruling::horizontal_at(40.0, 20.0, 120.0),
        Ruling::horizontal_at(60.0, 20.0, 120.0),
        Ruling::vertical_at(20.0, 20.0, 60.0),
        Ruling::vertical_at(70.0, 20.0, 60.0),
        Ruling::vertical_at(120.0, 20.0, 60.0),
    ];
    let mut glyphs = word(0.0, 15.0, "Inventory");
    glyphs.extend(word(0.0, 70.0, "stocktaking"));
    glyphs.extend(word(25.0, 25.0, "a1"));
    glyphs.extend(word(25.0, 75.0, "b1"));
    glyphs.extend(word(45.0, 25.0, "a2"));
    glyphs.extend(word(45.0, 75.0, "b2"));
    glyphs.extend(word(62.0, 20.0, "f"));
    Page::new(1, 150.0, 100.0, 0, glyphs, rulings)
}

// ============================================================================
// Stream
// ============================================================================

#[test]
fn test_stream_infers_columns_from_alignment() {
    let tables = BasicExtractor::new().extract(&aligned_page());
    assert_eq!(tables.len(), 1);
    let table = &tables[0];

    assert_eq!(table.method(), ExtractionMethod::Stream);
    assert_eq!(table.page_number(), 3);
    assert_eq!(
        table.to_text_grid(false),
        vec![vec!["name", "qty"], vec!["bolt", "12"], vec!["nut", "7"]]
    );
}

#[test]
fn test_stream_with_explicit_columns() {
    let tables = BasicExtractor::new().extract_with_columns(&aligned_page(), &[50.0, 150.0]);
    let grid = tables[0].to_text_grid(false);
    assert_eq!(grid[0], vec!["name", "qty"]);
    assert_eq!(tables[0].col_count(), 2);
}

#[test]
fn test_explicit_column_blocks_word_merging() {
    let page = Page::new(1, 100.0, 100.0, 0, word(0.0, 0.0, "abcd"), Vec::new());
    let tables = BasicExtractor::new().extract_with_columns(&page, &[12.0]);
    assert_eq!(tables[0].to_text_grid(false), vec![vec!["abc", "d"]]);
}

#[test]
fn test_empty_page_gives_one_empty_table() {
    let page = Page::new(1, 100.0, 100.0, 0, Vec::new(), Vec::new());
    let tables = BasicExtractor::new().extract(&page);
    assert_eq!(tables.len(), 1);
    assert!(tables[0].is_empty());
    assert!(tables[0].rows().is_empty());
    assert_eq!(tables[0].rectangle(), Rectangle::default());
}

// ============================================================================
// Method selection
// ============================================================================

#[test]
fn test_guess_picks_lattice_on_a_ruled_grid() {
    let tables = extract_tables(&ruled_page(), &ExtractionSettings::default());
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].method(), ExtractionMethod::Lattice);
    assert_eq!(
        tables[0].to_text_grid(false),
        vec![vec!["a1", "b1"], vec!["a2", "b2"]]
    );
}

#[test]
fn test_guess_picks_stream_without_rulings() {
    let tables = extract_tables(&aligned_page(), &ExtractionSettings::default());
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].method(), ExtractionMethod::Stream);
}

#[test]
fn test_forced_stream_on_a_ruled_grid() {
    let settings = ExtractionSettings::default().with_method(ExtractionMethod::Stream);
    let tables = extract_tables(&ruled_page(), &settings);
    assert_eq!(tables[0].method(), ExtractionMethod::Stream);
    assert_eq!(tables[0].row_count(), 4);
}

#[test]
fn test_supplied_rulings_force_lattice() {
    let ruled = ruled_page();
    let bare = Page::new(1, 150.0, 100.0, 0, ruled.glyphs().to_vec(), Vec::new());
    let settings = ExtractionSettings::default().with_rulings(ruled.raw_rulings().to_vec());

    let tables = extract_tables(&bare, &settings);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].method(), ExtractionMethod::Lattice);
    assert_eq!(tables[0].get(1, 1).text(false), "b2");
}

// ============================================================================
// Areas
// ============================================================================

#[test]
fn test_area_restricts_extraction() {
    let settings = ExtractionSettings::default()
        .with_method(ExtractionMethod::Stream)
        .with_area(Rectangle::from_corners(0.0, 25.0, 200.0, 200.0));
    let tables = extract_tables(&aligned_page(), &settings);
    assert_eq!(
        tables[0].to_text_grid(false),
        vec![vec!["bolt", "12"], vec!["nut", "7"]]
    );
}

#[test]
fn test_cropped_page_keeps_page_number_and_bounds() {
    let page = ruled_page();
    let area = Rectangle::from_corners(20.0, 20.0, 70.0, 40.0);
    let cropped = page.area(&area);

    assert_eq!(cropped.number(), page.number());
    assert_eq!(cropped.rectangle(), area);
    let text: String = cropped.text().iter().map(TextElement::text).collect();
    assert_eq!(text, "a1");
    assert!(!cropped.raw_rulings().is_empty());
    assert!(cropped.raw_rulings().iter().all(|r| {
        r.left() >= area.left
            && r.right() <= area.right()
            && r.top() >= area.top
            && r.bottom() <= area.bottom()
    }));
}

#[test]
fn test_line_returns_setting_is_carried() {
    let settings = ExtractionSettings::default().with_line_returns(true);
    assert!(settings.use_line_returns);
    assert_eq!(settings.method, ExtractionMethod::Guess);
}
