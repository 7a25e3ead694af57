//! One page worth of positioned primitives.

use once_cell::unsync::OnceCell;

use crate::geometry::{HasRectangle, Rectangle, Ruling};
use crate::index::SpatialIndex;
use crate::table::{ProcessedRulings, crop_rulings_to_area, process_rulings};
use crate::text::TextElement;

/// Glyphs and rulings of a page (or of an area cropped from one).
///
/// The glyph index is built at construction; rulings are snapped and
/// collapsed on first use.
pub struct Page {
    number: usize,
    rect: Rectangle,
    rotation: i32,
    glyphs: Vec<TextElement>,
    rulings: Vec<Ruling>,
    min_char_width: f64,
    min_char_height: f64,
    index: SpatialIndex,
    processed: OnceCell<ProcessedRulings>,
}

impl Page {
    pub fn new(
        number: usize,
        width: f64,
        height: f64,
        rotation: i32,
        glyphs: Vec<TextElement>,
        rulings: Vec<Ruling>,
    ) -> Self {
        Self::with_bounds(
            number,
            Rectangle::new(0.0, 0.0, width, height),
            rotation,
            glyphs,
            rulings,
        )
    }

    fn with_bounds(
        number: usize,
        rect: Rectangle,
        rotation: i32,
        glyphs: Vec<TextElement>,
        rulings: Vec<Ruling>,
    ) -> Self {
        let min_char_width = glyphs
            .iter()
            .map(TextElement::width)
            .fold(f64::MAX, f64::min);
        let min_char_height = glyphs
            .iter()
            .map(TextElement::height)
            .fold(f64::MAX, f64::min);
        let index = SpatialIndex::build(&glyphs);
        Self {
            number,
            rect,
            rotation,
            glyphs,
            rulings,
            min_char_width,
            min_char_height,
            index,
            processed: OnceCell::new(),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn width(&self) -> f64 {
        self.rect.width
    }

    pub fn height(&self) -> f64 {
        self.rect.height
    }

    pub fn glyphs(&self) -> &[TextElement] {
        &self.glyphs
    }

    pub fn has_text(&self) -> bool {
        !self.glyphs.is_empty()
    }

    /// Rulings as given, before any clean-up.
    pub fn raw_rulings(&self) -> &[Ruling] {
        &self.rulings
    }

    /// Smallest glyph width and height; `None` without glyphs.
    pub fn min_char_size(&self) -> Option<(f64, f64)> {
        self.has_text()
            .then_some((self.min_char_width, self.min_char_height))
    }

    /// Union of all glyph rectangles; `None` without glyphs.
    pub fn text_bounds(&self) -> Option<Rectangle> {
        self.has_text().then(|| self.index.bounds())
    }

    /// Every glyph of the page, in reading order.
    pub fn text(&self) -> Vec<TextElement> {
        match self.text_bounds() {
            Some(bounds) => self.text_in(&bounds),
            None => Vec::new(),
        }
    }

    /// Glyphs lying fully inside `area`, in reading order.
    pub fn text_in(&self, area: &Rectangle) -> Vec<TextElement> {
        self.index
            .contains(area)
            .into_iter()
            .map(|id| self.glyphs[id].clone())
            .collect()
    }

    /// Snapped and collapsed rulings, computed once.
    pub fn rulings(&self) -> &ProcessedRulings {
        self.processed
            .get_or_init(|| process_rulings(&self.rulings, self.min_char_size()))
    }

    pub fn horizontal_rulings(&self) -> &[Ruling] {
        &self.rulings().horizontal
    }

    pub fn vertical_rulings(&self) -> &[Ruling] {
        &self.rulings().vertical
    }

    /// A new page restricted to `area`: glyphs fully inside it, rulings
    /// clipped to it.
    pub fn area(&self, area: &Rectangle) -> Page {
        Page::with_bounds(
            self.number,
            *area,
            self.rotation,
            self.text_in(area),
            crop_rulings_to_area(&self.rulings, area),
        )
    }
}

impl HasRectangle for Page {
    fn rectangle(&self) -> Rectangle {
        self.rect
    }
}
