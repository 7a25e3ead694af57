//! Positioned glyphs as produced by the upstream page decoder.

use crate::geometry::{HasRectangle, Rectangle};

/// Writing-direction hint attached to a glyph by the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextDirection {
    Ltr,
    Rtl,
    #[default]
    Unknown,
}

/// A single glyph (or short run of characters) with its font metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    rect: Rectangle,
    text: String,
    font: String,
    font_size: f64,
    width_of_space: f64,
    direction: TextDirection,
}

impl TextElement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        top: f64,
        left: f64,
        width: f64,
        height: f64,
        font: impl Into<String>,
        font_size: f64,
        text: impl Into<String>,
        width_of_space: f64,
    ) -> Self {
        Self {
            rect: Rectangle::new(top, left, width, height),
            text: text.into(),
            font: font.into(),
            font_size,
            width_of_space,
            direction: TextDirection::Unknown,
        }
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn width_of_space(&self) -> f64 {
        self.width_of_space
    }

    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn top(&self) -> f64 {
        self.rect.top
    }

    pub fn left(&self) -> f64 {
        self.rect.left
    }

    pub fn width(&self) -> f64 {
        self.rect.width
    }

    pub fn height(&self) -> f64 {
        self.rect.height
    }

    pub fn right(&self) -> f64 {
        self.rect.right()
    }

    pub fn bottom(&self) -> f64 {
        self.rect.bottom()
    }
}

impl HasRectangle for TextElement {
    fn rectangle(&self) -> Rectangle {
        self.rect
    }
}
