//! Words: ordered runs of glyphs with a merged bounding rectangle.

use std::cmp::Ordering;

use crate::geometry::{HasRectangle, Rectangle, reading_order};

use super::bidi::{Directionality, direction_counts, element_directionality};
use super::element::TextElement;

/// An ordered sequence of glyphs. The rectangle is always the union of the glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct TextChunk {
    rect: Rectangle,
    elements: Vec<TextElement>,
}

impl TextChunk {
    pub fn new(first: TextElement) -> Self {
        Self {
            rect: first.rectangle(),
            elements: vec![first],
        }
    }

    /// Build a chunk from glyphs in the given order; `None` when there are none.
    pub fn from_elements(elements: Vec<TextElement>) -> Option<Self> {
        let rect = Rectangle::bounding_box_of(&elements).ok()?;
        Some(Self { rect, elements })
    }

    pub fn add(&mut self, element: TextElement) {
        self.rect.merge(&element.rectangle());
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn text(&self) -> String {
        self.elements.iter().map(TextElement::text).collect()
    }

    /// Combine two chunks, keeping whichever comes first in reading order first.
    pub fn merged(&self, other: &TextChunk) -> TextChunk {
        let (first, second) = if reading_order(self, other) == Ordering::Greater {
            (other, self)
        } else {
            (self, other)
        };
        let mut elements = first.elements.clone();
        elements.extend(second.elements.iter().cloned());
        TextChunk {
            rect: self.rect.union(&other.rect),
            elements,
        }
    }

    /// Whether every character of the chunk's text is one of `chars`.
    pub fn is_same_char(&self, chars: &[char]) -> bool {
        self.elements
            .iter()
            .flat_map(|e| e.text().chars())
            .all(|c| chars.contains(&c))
    }

    /// Whether all chunks consist of one repeated character.
    pub fn all_same_char(chunks: &[TextChunk]) -> bool {
        let Some(first) = chunks
            .iter()
            .flat_map(|c| c.elements.iter())
            .flat_map(|e| e.text().chars())
            .next()
        else {
            return false;
        };
        chunks.iter().all(|c| c.is_same_char(&[first]))
    }

    /// Split before glyph `i`. Both halves must be non-empty.
    pub fn split_at(&self, i: usize) -> Option<(TextChunk, TextChunk)> {
        if i == 0 || i >= self.elements.len() {
            return None;
        }
        let head = TextChunk::from_elements(self.elements[..i].to_vec())?;
        let tail = TextChunk::from_elements(self.elements[i..].to_vec())?;
        Some((head, tail))
    }

    /// Cut out every run of at least `min_run` consecutive `filler` glyphs,
    /// splitting the chunk around each run. A chunk made only of filler is
    /// returned whole.
    pub fn squeeze(&self, filler: char, min_run: usize) -> Vec<TextChunk> {
        let is_filler = |e: &TextElement| {
            let text = e.text();
            let lead = if text.chars().count() > 1 {
                text.trim().chars().next()
            } else {
                text.chars().next()
            };
            lead == Some(filler)
        };

        let n = self.elements.len();
        let mut i = 0usize;
        while i < n {
            if !is_filler(&self.elements[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < n && is_filler(&self.elements[i]) {
                i += 1;
            }
            if i - start < min_run || (start == 0 && i == n) {
                continue;
            }

            let mut out = Vec::new();
            if let Some(head) = TextChunk::from_elements(self.elements[..start].to_vec()) {
                out.push(head);
            }
            if let Some(tail) = TextChunk::from_elements(self.elements[i..].to_vec()) {
                out.extend(tail.squeeze(filler, min_run));
            }
            return out;
        }
        vec![self.clone()]
    }

    /// 1 when left-to-right characters outnumber right-to-left ones, -1 for
    /// the reverse, 0 on a tie.
    pub fn is_ltr_dominant(&self) -> i32 {
        let (ltr, rtl) = direction_counts(&self.text());
        match ltr.cmp(&rtl) {
            Ordering::Greater => 1,
            Ordering::Less => -1,
            Ordering::Equal => 0,
        }
    }

    /// Split into runs of one directionality, reverse right-to-left runs, and
    /// order the runs for a left-to-right or right-to-left dominant chunk.
    ///
    /// Neutral glyphs stay in the run they follow.
    pub fn group_by_directionality(&self, ltr_dominant: bool) -> TextChunk {
        let mut runs: Vec<Vec<TextElement>> = Vec::new();
        let mut buff: Vec<TextElement> = Vec::new();
        let mut buff_dir = Directionality::Neutral;

        for element in &self.elements {
            let dir = element_directionality(element);
            if dir == buff_dir || dir == Directionality::Neutral {
                buff.push(element.clone());
                continue;
            }
            if buff_dir == Directionality::Rtl {
                buff.reverse();
            }
            if !buff.is_empty() {
                runs.push(std::mem::take(&mut buff));
            }
            buff.push(element.clone());
            buff_dir = dir;
        }
        if buff_dir == Directionality::Rtl {
            buff.reverse();
        }
        if !buff.is_empty() {
            runs.push(buff);
        }

        if !ltr_dominant {
            runs.reverse();
        }
        TextChunk {
            rect: self.rect,
            elements: runs.into_iter().flatten().collect(),
        }
    }
}

impl HasRectangle for TextChunk {
    fn rectangle(&self) -> Rectangle {
        self.rect
    }

    fn ltr_dominance(&self) -> i32 {
        self.is_ltr_dominant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(left: f64, text: &str) -> TextElement {
        TextElement::new(0.0, left, 5.0, 10.0, "F1", 10.0, text, 2.5)
    }

    fn chunk(texts: &[&str]) -> TextChunk {
        let elements = texts
            .iter()
            .enumerate()
            .map(|(i, t)| glyph(i as f64 * 5.0, t))
            .collect();
        TextChunk::from_elements(elements).unwrap()
    }

    #[test]
    fn rectangle_is_union_of_glyphs() {
        let c = chunk(&["a", "b", "c"]);
        assert_eq!(c.rectangle(), Rectangle::new(0.0, 0.0, 15.0, 10.0));
    }

    #[test]
    fn squeeze_cuts_long_space_runs() {
        let c = chunk(&["a", "b", " ", " ", " ", "c", "d"]);
        let parts: Vec<String> = c.squeeze(' ', 3).iter().map(TextChunk::text).collect();
        assert_eq!(parts, vec!["ab", "cd"]);
    }

    #[test]
    fn squeeze_keeps_short_runs() {
        let c = chunk(&["a", " ", " ", "b"]);
        let parts = c.squeeze(' ', 3);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].text(), "a  b");
    }

    #[test]
    fn squeeze_recurses_into_the_tail() {
        let c = chunk(&["a", ".", ".", ".", "b", ".", ".", ".", ".", "c"]);
        let parts: Vec<String> = c.squeeze('.', 3).iter().map(TextChunk::text).collect();
        assert_eq!(parts, vec!["a", "b", "c"]);
    }

    #[test]
    fn squeeze_drops_trailing_run() {
        let c = chunk(&["a", " ", " ", " "]);
        let parts: Vec<String> = c.squeeze(' ', 3).iter().map(TextChunk::text).collect();
        assert_eq!(parts, vec!["a"]);
    }

    #[test]
    fn all_filler_chunk_is_kept() {
        let c = chunk(&[" ", " ", " "]);
        assert_eq!(c.squeeze(' ', 3), vec![c.clone()]);
    }

    #[test]
    fn all_same_char_detects_leaders() {
        assert!(TextChunk::all_same_char(&[chunk(&["-", "-"]), chunk(&["-"])]));
        assert!(!TextChunk::all_same_char(&[chunk(&["-", "_"])]));
        assert!(!TextChunk::all_same_char(&[]));
    }

    #[test]
    fn mixed_runs_are_reordered() {
        // "ab" then hebrew alef-bet, ltr dominant: ltr run first, rtl run reversed
        let c = chunk(&["a", "b", "\u{05D0}", "\u{05D1}"]);
        let grouped = c.group_by_directionality(true);
        assert_eq!(grouped.text(), "ab\u{05D1}\u{05D0}");
        let grouped = c.group_by_directionality(false);
        assert_eq!(grouped.text(), "\u{05D1}\u{05D0}ab");
    }

    #[test]
    fn split_at_bounds() {
        let c = chunk(&["a", "b"]);
        assert!(c.split_at(0).is_none());
        let (h, t) = c.split_at(1).unwrap();
        assert_eq!((h.text().as_str(), t.text().as_str()), ("a", "b"));
    }
}
