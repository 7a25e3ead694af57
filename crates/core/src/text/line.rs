//! Grouping words into text lines.

use tracing::trace;

use crate::geometry::{HasRectangle, Rectangle};

use super::chunk::TextChunk;

/// Characters treated as inter-word whitespace.
pub const WHITE_SPACE_CHARS: [char; 5] = [' ', '\t', '\r', '\n', '\u{c}'];

/// Runs of at least this many consecutive filler glyphs are cut out of words.
const SQUEEZE_MIN_RUN: usize = 3;

/// Lines at least this fraction of the text width made of one repeated
/// character are ruling artifacts (dashes, underscores).
const RULING_ARTIFACT_WIDTH_RATIO: f64 = 0.9;

/// A horizontal line of text: ordered words with a merged rectangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    rect: Rectangle,
    chunks: Vec<TextChunk>,
}

impl Line {
    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<TextChunk> {
        self.chunks
    }

    pub fn add(&mut self, chunk: TextChunk) {
        if self.chunks.is_empty() {
            self.rect = chunk.rectangle();
        } else {
            self.rect.merge(&chunk.rectangle());
        }
        self.chunks.push(chunk);
    }

    pub fn text(&self) -> String {
        self.chunks.iter().map(TextChunk::text).collect()
    }

    fn is_ruling_artifact(&self, text_width: f64) -> bool {
        text_width > 0.0
            && self.rect.width / text_width >= RULING_ARTIFACT_WIDTH_RATIO
            && TextChunk::all_same_char(&self.chunks)
    }

    fn squeezed(self, filler: char) -> Line {
        let mut out = Line::default();
        for chunk in self.chunks {
            for piece in chunk.squeeze(filler, SQUEEZE_MIN_RUN) {
                out.add(piece);
            }
        }
        out
    }
}

impl HasRectangle for Line {
    fn rectangle(&self) -> Rectangle {
        self.rect
    }
}

/// Split words (in reading order) into lines.
///
/// A word starts a new line when it does not vertically overlap the running
/// bounds of the current line. Lines that are just a long rule of one repeated
/// character are dropped, and long space runs inside words are cut out.
pub fn group_by_lines(chunks: &[TextChunk]) -> Vec<Line> {
    let Ok(text_bounds) = Rectangle::bounding_box_of(chunks) else {
        return Vec::new();
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut current = Line::default();
    for chunk in chunks {
        if !current.chunks.is_empty()
            && !current.rect.vertically_overlaps(&chunk.rectangle())
        {
            lines.push(std::mem::take(&mut current));
        }
        current.add(chunk.clone());
    }
    if !current.chunks.is_empty() {
        lines.push(current);
    }

    let total = lines.len();
    let lines: Vec<Line> = lines
        .into_iter()
        .filter(|line| !line.is_ruling_artifact(text_bounds.width))
        .map(|line| line.squeezed(' '))
        .filter(|line| !line.chunks.is_empty())
        .collect();
    trace!(
        dropped = total - lines.len(),
        kept = lines.len(),
        "grouped words into lines"
    );
    lines
}
