//! Geometry kernel: rectangles, rulings, points and line clipping.
//!
//! Coordinates live in a top-left-origin page space: `y` grows downwards,
//! so `top <= bottom` for every well-formed rectangle.

mod clip;
mod rectangle;
mod ruling;

pub use clip::clip_line;
pub use rectangle::{
    HasRectangle, Rectangle, VERTICAL_COMPARISON_THRESHOLD, reading_order, sort_by_reading_order,
};
pub use ruling::{
    COLINEAR_OR_PARALLEL_PIXEL_EXPAND_AMOUNT, Orientation, PERPENDICULAR_PIXEL_EXPAND_AMOUNT,
    Ruling,
};

use std::cmp::Ordering;

use crate::utils::{KeyPoint, cmp_f64, feq, key_point};

/// A point in page space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Exact (bit-pattern) key for hashing and ordered maps.
    pub(crate) fn key(&self) -> KeyPoint {
        key_point(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Order points by y, then x, treating coordinates within tolerance as equal.
pub fn y_first_point_order(a: &Point, b: &Point) -> Ordering {
    if !feq(a.y, b.y) {
        return cmp_f64(a.y, b.y);
    }
    if !feq(a.x, b.x) {
        return cmp_f64(a.x, b.x);
    }
    Ordering::Equal
}

/// Order points by x, then y, treating coordinates within tolerance as equal.
pub fn x_first_point_order(a: &Point, b: &Point) -> Ordering {
    if !feq(a.x, b.x) {
        return cmp_f64(a.x, b.x);
    }
    if !feq(a.y, b.y) {
        return cmp_f64(a.y, b.y);
    }
    Ordering::Equal
}
