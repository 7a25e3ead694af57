//! Axis-aligned rectangles and the natural reading-order comparator.

use std::cmp::Ordering;

use crate::error::{Result, TableError};
use crate::utils::{cmp_f64, sort_tolerant};

use super::Point;

/// Two rectangles whose vertical overlap ratio exceeds this are on the same line.
pub const VERTICAL_COMPARISON_THRESHOLD: f64 = 0.4;

/// An axis-aligned rectangle in top-left-origin page space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Anything that occupies a rectangle on the page.
pub trait HasRectangle {
    fn rectangle(&self) -> Rectangle;

    /// 1 for left-to-right dominant content, -1 for right-to-left, 0 otherwise.
    fn ltr_dominance(&self) -> i32 {
        0
    }
}

impl HasRectangle for Rectangle {
    fn rectangle(&self) -> Rectangle {
        *self
    }
}

impl<T: HasRectangle + ?Sized> HasRectangle for &T {
    fn rectangle(&self) -> Rectangle {
        (**self).rectangle()
    }

    fn ltr_dominance(&self) -> i32 {
        (**self).ltr_dominance()
    }
}

impl Rectangle {
    /// Create a rectangle; negative extents are flipped so width/height are never negative.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        let (left, width) = if width < 0.0 {
            (left + width, -width)
        } else {
            (left, width)
        };
        let (top, height) = if height < 0.0 {
            (top + height, -height)
        } else {
            (top, height)
        };
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Create a rectangle from two opposite corners, in any order.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(y0.min(y1), x0.min(x1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left + self.width / 2.0,
            self.top + self.height / 2.0,
        )
    }

    /// Corners in order top-left, top-right, bottom-right, bottom-left.
    pub fn points(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::from_corners(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Grow `self` in place to cover `other`.
    pub fn merge(&mut self, other: &Rectangle) {
        *self = self.union(other);
    }

    pub fn vertical_overlap(&self, other: &Rectangle) -> f64 {
        (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0)
    }

    pub fn vertically_overlaps(&self, other: &Rectangle) -> bool {
        self.vertical_overlap(other) > 0.0
    }

    pub fn horizontal_overlap(&self, other: &Rectangle) -> f64 {
        (self.right().min(other.right()) - self.left.max(other.left)).max(0.0)
    }

    pub fn horizontally_overlaps(&self, other: &Rectangle) -> bool {
        self.horizontal_overlap(other) > 0.0
    }

    /// Vertical overlap normalised by the shorter of the two heights.
    pub fn vertical_overlap_ratio(&self, other: &Rectangle) -> f64 {
        let delta = self.height.min(other.height);
        if delta <= 0.0 {
            return 0.0;
        }
        let (t1, b1, t2, b2) = (self.top, self.bottom(), other.top, other.bottom());
        let overlap = if t2 <= t1 && t1 <= b2 && b2 <= b1 {
            b2 - t1
        } else if t1 <= t2 && t2 <= b1 && b1 <= b2 {
            b1 - t2
        } else if t1 <= t2 && t2 <= b2 && b2 <= b1 {
            b2 - t2
        } else if t2 <= t1 && t1 <= b1 && b1 <= b2 {
            b1 - t1
        } else {
            0.0
        };
        overlap / delta
    }

    /// Intersection area divided by union area.
    pub fn overlap_ratio(&self, other: &Rectangle) -> f64 {
        let intersection = self.horizontal_overlap(other) * self.vertical_overlap(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }

    /// Interiors overlap (touching edges do not count).
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Boundary-inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Whether `other` lies fully inside `self` (boundary inclusive).
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.left >= self.left
            && other.right() <= self.right()
            && other.top >= self.top
            && other.bottom() <= self.bottom()
    }

    /// Bounding box of a non-empty collection.
    ///
    /// An empty collection has no bounding box and yields
    /// [`TableError::EmptyBoundingBox`].
    pub fn bounding_box_of<I>(items: I) -> Result<Rectangle>
    where
        I: IntoIterator,
        I::Item: HasRectangle,
    {
        let mut iter = items.into_iter();
        let first = iter
            .next()
            .ok_or(TableError::EmptyBoundingBox)?
            .rectangle();
        Ok(iter.fold(first, |acc, item| acc.union(&item.rectangle())))
    }
}

/// Natural reading order: same line (vertical overlap ratio above
/// [`VERTICAL_COMPARISON_THRESHOLD`]) compares by left edge, otherwise by bottom.
///
/// When both sides are right-to-left dominant the left-edge comparison is
/// reversed. This is not transitive across partially overlapping rows; sort
/// with [`sort_by_reading_order`], never `slice::sort_by`.
pub fn reading_order<T: HasRectangle + ?Sized>(a: &T, b: &T) -> Ordering {
    let ra = a.rectangle();
    let rb = b.rectangle();
    if ra == rb {
        return Ordering::Equal;
    }
    if ra.vertical_overlap_ratio(&rb) > VERTICAL_COMPARISON_THRESHOLD {
        let ord = cmp_f64(ra.left, rb.left);
        if a.ltr_dominance() < 0 && b.ltr_dominance() < 0 {
            ord.reverse()
        } else {
            ord
        }
    } else {
        cmp_f64(ra.bottom(), rb.bottom())
    }
}

/// Sort items in reading order with a comparator-tolerant sort.
pub fn sort_by_reading_order<T: HasRectangle>(items: &mut Vec<T>) {
    sort_tolerant(items, |a, b| reading_order(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_extents_are_normalised() {
        let r = Rectangle::new(10.0, 10.0, -5.0, -4.0);
        assert_eq!(r, Rectangle::new(6.0, 5.0, 5.0, 4.0));
    }

    #[test]
    fn adjacent_rectangles_have_zero_area_overlap() {
        let a = Rectangle::new(0.0, 10.0, 10.0, 10.0);
        let b = Rectangle::new(0.0, 20.0, 10.0, 10.0);
        assert_eq!(a.vertical_overlap(&b), 10.0);
        assert_eq!(a.horizontal_overlap(&b), 0.0);
        assert_eq!(a.overlap_ratio(&b), 0.0);
    }

    #[test]
    fn vertical_overlap_ratio_is_symmetric() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(5.0, 0.0, 10.0, 20.0);
        assert_eq!(a.vertical_overlap_ratio(&b), 0.5);
        assert_eq!(b.vertical_overlap_ratio(&a), 0.5);
    }

    #[test]
    fn union_covers_both() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(20.0, 5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rectangle::new(0.0, 0.0, 15.0, 30.0));
    }

    #[test]
    fn bounding_box_of_empty_fails() {
        let empty: Vec<Rectangle> = Vec::new();
        assert_eq!(
            Rectangle::bounding_box_of(&empty),
            Err(TableError::EmptyBoundingBox)
        );
    }

    #[test]
    fn reading_order_same_line_uses_left() {
        let a = Rectangle::new(0.0, 50.0, 10.0, 10.0);
        let b = Rectangle::new(1.0, 10.0, 10.0, 10.0);
        assert_eq!(reading_order(&a, &b), Ordering::Greater);
    }

    #[test]
    fn reading_order_different_lines_use_bottom() {
        let a = Rectangle::new(0.0, 50.0, 10.0, 10.0);
        let b = Rectangle::new(20.0, 10.0, 10.0, 10.0);
        assert_eq!(reading_order(&a, &b), Ordering::Less);
    }
}
