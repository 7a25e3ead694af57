//! Bidirectional category helpers for word assembly.
//!
//! Glyphs are classified by the Unicode bidi class of their characters
//! (UAX#9) into left-to-right, right-to-left, or neutral.

use unicode_bidi::{BidiClass, BidiInfo, bidi_class};

use super::element::{TextDirection, TextElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directionality {
    Ltr,
    Rtl,
    Neutral,
}

/// Strong direction of a single character.
pub fn char_directionality(c: char) -> Directionality {
    match bidi_class(c) {
        BidiClass::L | BidiClass::LRE | BidiClass::LRO => Directionality::Ltr,
        BidiClass::R | BidiClass::AL | BidiClass::RLE | BidiClass::RLO => Directionality::Rtl,
        _ => Directionality::Neutral,
    }
}

/// Direction of a glyph: its first character, falling back to the decoder's
/// hint when that character is neutral.
pub fn element_directionality(element: &TextElement) -> Directionality {
    let by_char = element
        .text()
        .chars()
        .next()
        .map(char_directionality)
        .unwrap_or(Directionality::Neutral);
    match (by_char, element.direction()) {
        (Directionality::Neutral, TextDirection::Ltr) => Directionality::Ltr,
        (Directionality::Neutral, TextDirection::Rtl) => Directionality::Rtl,
        (d, _) => d,
    }
}

/// Count of (left-to-right, right-to-left) characters in `text`.
pub fn direction_counts(text: &str) -> (usize, usize) {
    text.chars()
        .fold((0, 0), |(ltr, rtl), c| match char_directionality(c) {
            Directionality::Ltr => (ltr + 1, rtl),
            Directionality::Rtl => (ltr, rtl + 1),
            Directionality::Neutral => (ltr, rtl),
        })
}

/// Convert cell text from logical to visual order, one line at a time.
///
/// Lines are separated by `\r` (cell line returns) or `\n`; separators are kept.
pub fn reorder_text_per_line(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(text.len());
    for piece in text.split_inclusive(['\r', '\n']) {
        let (line, sep) = match piece.chars().last() {
            Some(c @ ('\r' | '\n')) => (&piece[..piece.len() - 1], Some(c)),
            _ => (piece, None),
        };
        if !line.is_empty() {
            out.push_str(&reorder_single_line(line));
        }
        if let Some(c) = sep {
            out.push(c);
        }
    }
    out
}

fn reorder_single_line(line: &str) -> String {
    let info = BidiInfo::new(line, None);
    if info.paragraphs.is_empty() {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    for para in &info.paragraphs {
        out.push_str(&info.reorder_line(para, para.range.clone()));
    }
    out
}
