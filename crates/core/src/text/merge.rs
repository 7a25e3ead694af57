//! Assembling glyphs into words.
//!
//! Glyph spacing decides word boundaries: a glyph joins the current word when
//! it sits on the same line, no vertical ruling separates it from the previous
//! glyph, and the gap is smaller than the font's space width. Gaps wider than
//! half a character get a synthesized space glyph.

use tracing::{debug, trace};

use crate::geometry::{HasRectangle, Ruling};
use crate::utils::{extents_overlap, feq};

use super::chunk::TextChunk;
use super::element::TextElement;

/// Glyphs with identical text overlapping more than this are drawn twice (fake bold).
const DUPLICATE_OVERLAP_RATIO: f64 = 0.5;

/// Fraction of the space width that already separates two words.
const SPACE_WIDTH_FACTOR: f64 = 0.5;

/// Fraction of the average character width that already separates two words.
const CHAR_WIDTH_FACTOR: f64 = 0.5;

fn char_width(element: &TextElement) -> f64 {
    let n = element.text().chars().count();
    if n == 0 {
        element.width()
    } else {
        element.width() / n as f64
    }
}

fn vertically_overlaps_ruling(element: &TextElement, ruling: &Ruling) -> bool {
    element.bottom().min(ruling.bottom()) - element.top().max(ruling.top()) > 0.0
}

/// Whether a vertical ruling separates two glyphs: it spans both of them
/// vertically and its x lies strictly between their left edges.
fn ruling_between(prev: &TextElement, chr: &TextElement, rulings: &[Ruling]) -> bool {
    rulings.iter().filter(|r| r.vertical()).any(|r| {
        let x = r.position();
        vertically_overlaps_ruling(prev, r)
            && vertically_overlaps_ruling(chr, r)
            && ((prev.left() < x && chr.left() > x) || (prev.left() > x && chr.left() < x))
    })
}

/// Running vertical bounds of the line being assembled.
struct LineBounds {
    max_bottom: f64,
    max_height: f64,
}

impl LineBounds {
    fn start(element: &TextElement) -> Self {
        Self {
            max_bottom: element.bottom(),
            max_height: element.height(),
        }
    }

    fn reset() -> Self {
        Self {
            max_bottom: -f64::MAX,
            max_height: -1.0,
        }
    }

    fn admits(&self, element: &TextElement) -> bool {
        extents_overlap(
            element.bottom(),
            element.height(),
            self.max_bottom,
            self.max_height,
        )
    }

    fn extend(&mut self, element: &TextElement) {
        self.max_bottom = self.max_bottom.max(element.bottom());
        self.max_height = self.max_height.max(element.height());
    }
}

/// Merge glyphs, given in reading order, into words.
///
/// `vertical_rulings` are column separators: a word never spans one. Each
/// word is finally reordered into directional runs.
pub fn merge_words(elements: &[TextElement], vertical_rulings: &[Ruling]) -> Vec<TextChunk> {
    let Some((first, rest)) = elements.split_first() else {
        return Vec::new();
    };

    let mut chunks = vec![TextChunk::new(first.clone())];
    let mut previous_avg_char_width = char_width(first);
    let mut end_of_last_text_x = first.right();
    let mut line = LineBounds::start(first);
    let mut last_word_spacing = -1.0_f64;

    for chr in rest {
        let Some(current) = chunks.last_mut() else {
            break;
        };
        let Some(prev) = current.elements().last().cloned() else {
            break;
        };

        if chr.text() == prev.text()
            && prev.rectangle().overlap_ratio(&chr.rectangle()) > DUPLICATE_OVERLAP_RATIO
        {
            trace!(text = chr.text(), "skipping overlapping duplicate glyph");
            continue;
        }
        if chr.text() == " " && feq(prev.left(), chr.left()) && feq(prev.top(), chr.top()) {
            continue;
        }

        if chr.font() != prev.font() || chr.font_size() != prev.font_size() {
            previous_avg_char_width = -1.0;
        }

        let across_ruling = ruling_between(&prev, chr, vertical_rulings);

        let word_spacing = chr.width_of_space();
        let delta_space = if word_spacing == 0.0 || word_spacing.is_nan() {
            f64::MAX
        } else if last_word_spacing < 0.0 {
            word_spacing * SPACE_WIDTH_FACTOR
        } else {
            (word_spacing + last_word_spacing) / 2.0 * SPACE_WIDTH_FACTOR
        };

        let avg_char_width = if previous_avg_char_width < 0.0 {
            char_width(chr)
        } else {
            (previous_avg_char_width + char_width(chr)) / 2.0
        };
        let delta_char = avg_char_width * CHAR_WIDTH_FACTOR;

        let mut expected_start = end_of_last_text_x + delta_space.min(delta_char);

        let same_line = line.admits(chr);
        if !same_line {
            expected_start = -f64::MAX;
            line = LineBounds::reset();
        }
        line.extend(chr);
        end_of_last_text_x = chr.right();

        let mut space: Option<TextElement> = None;
        if !across_ruling
            && same_line
            && expected_start < chr.left()
            && !prev.text().ends_with(' ')
        {
            let sp = TextElement::new(
                prev.top(),
                prev.left(),
                expected_start - prev.left(),
                prev.height(),
                prev.font(),
                prev.font_size(),
                " ",
                prev.width_of_space(),
            );
            current.add(sp.clone());
            space = Some(sp);
        }

        let dist = chr.left() - space.as_ref().map_or(prev.right(), TextElement::right);
        let joins = !across_ruling
            && same_line
            && if dist < 0.0 {
                current.rectangle().vertically_overlaps(&chr.rectangle())
            } else {
                dist < word_spacing
            };
        if joins {
            current.add(chr.clone());
        } else {
            chunks.push(TextChunk::new(chr.clone()));
        }

        last_word_spacing = word_spacing;
        previous_avg_char_width = match &space {
            Some(sp) => (avg_char_width + sp.width()) / 2.0,
            None => avg_char_width,
        };
    }

    debug!(
        glyphs = elements.len(),
        words = chunks.len(),
        "merged glyphs into words"
    );
    chunks
        .iter()
        .map(|chunk| chunk.group_by_directionality(chunk.is_ltr_dominant() >= 0))
        .collect()
}
