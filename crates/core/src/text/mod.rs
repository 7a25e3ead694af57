//! Text assembly: glyphs into words, words into lines.

pub mod bidi;
mod chunk;
mod element;
mod line;
mod merge;

pub use chunk::TextChunk;
pub use element::{TextDirection, TextElement};
pub use line::{Line, WHITE_SPACE_CHARS, group_by_lines};
pub use merge::merge_words;
