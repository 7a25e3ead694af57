//! Rulings: straight segments from stroked page graphics.
//!
//! A ruling within one degree of an axis is snapped onto that axis at
//! construction. Oblique rulings are kept but have no position/start/end.

use tracing::warn;

use crate::error::{Result, TableError};
use crate::utils::{feq, within};

use super::clip::clip_line;
use super::{Point, Rectangle};

/// Expansion applied when testing perpendicular rulings for near-intersection.
///
/// Empirically tuned; kept separate from the colinear amount because
/// expansions of two parallel rulings add up.
pub const PERPENDICULAR_PIXEL_EXPAND_AMOUNT: f64 = 2.0;

/// Expansion applied to each of two colinear or parallel rulings.
pub const COLINEAR_OR_PARALLEL_PIXEL_EXPAND_AMOUNT: f64 = 1.0;

/// Angular distance (degrees) from an axis that still counts as on-axis.
const AXIS_SNAP_DEGREES: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Oblique,
}

/// A normalized line segment `(x1, y1) -> (x2, y2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ruling {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Ruling {
    /// Build a ruling between two points, snapping near-axis segments onto the axis.
    pub fn new(p1: Point, p2: Point) -> Self {
        Self::raw(p1.x, p1.y, p2.x, p2.y).normalized()
    }

    /// Build a ruling from a (possibly degenerate) rectangle: the segment runs
    /// from its top-left to its bottom-right corner.
    pub fn from_rect(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self::new(
            Point::new(left, top),
            Point::new(left + width, top + height),
        )
    }

    pub fn horizontal_at(y: f64, left: f64, right: f64) -> Self {
        Self::new(Point::new(left, y), Point::new(right, y))
    }

    pub fn vertical_at(x: f64, top: f64, bottom: f64) -> Self {
        Self::new(Point::new(x, top), Point::new(x, bottom))
    }

    const fn raw(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn normalized(self) -> Self {
        let angle = self.angle();
        if within(angle, 0.0, AXIS_SNAP_DEGREES)
            || within(angle, 180.0, AXIS_SNAP_DEGREES)
            || within(angle, 360.0, AXIS_SNAP_DEGREES)
        {
            Self::raw(self.x1, self.y1, self.x2, self.y1)
        } else if within(angle, 90.0, AXIS_SNAP_DEGREES) || within(angle, 270.0, AXIS_SNAP_DEGREES)
        {
            Self::raw(self.x1, self.y1, self.x1, self.y2)
        } else {
            self
        }
    }

    pub fn p1(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn p2(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn top(&self) -> f64 {
        self.y1
    }

    pub fn left(&self) -> f64 {
        self.x1
    }

    pub fn bottom(&self) -> f64 {
        self.y2
    }

    pub fn right(&self) -> f64 {
        self.x2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn length(&self) -> f64 {
        (self.x1 - self.x2).hypot(self.y1 - self.y2)
    }

    /// Direction of `p1 -> p2` in degrees, in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        let angle = (self.y2 - self.y1).atan2(self.x2 - self.x1).to_degrees();
        if angle < 0.0 { angle + 360.0 } else { angle }
    }

    pub fn vertical(&self) -> bool {
        self.length() > 0.0 && feq(self.x1, self.x2)
    }

    pub fn horizontal(&self) -> bool {
        self.length() > 0.0 && feq(self.y1, self.y2)
    }

    pub fn oblique(&self) -> bool {
        !(self.vertical() || self.horizontal())
    }

    pub fn orientation(&self) -> Orientation {
        if self.vertical() {
            Orientation::Vertical
        } else if self.horizontal() {
            Orientation::Horizontal
        } else {
            Orientation::Oblique
        }
    }

    fn oblique_error(&self) -> TableError {
        TableError::ObliqueRuling {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }

    /// x of a vertical ruling, y of a horizontal one.
    pub fn try_position(&self) -> Result<f64> {
        match self.orientation() {
            Orientation::Vertical => Ok(self.x1),
            Orientation::Horizontal => Ok(self.y1),
            Orientation::Oblique => Err(self.oblique_error()),
        }
    }

    /// Coordinate where the ruling begins along its own axis.
    pub fn try_start(&self) -> Result<f64> {
        match self.orientation() {
            Orientation::Vertical => Ok(self.y1),
            Orientation::Horizontal => Ok(self.x1),
            Orientation::Oblique => Err(self.oblique_error()),
        }
    }

    /// Coordinate where the ruling ends along its own axis.
    pub fn try_end(&self) -> Result<f64> {
        match self.orientation() {
            Orientation::Vertical => Ok(self.y2),
            Orientation::Horizontal => Ok(self.x2),
            Orientation::Oblique => Err(self.oblique_error()),
        }
    }

    /// # Panics
    ///
    /// Panics if the ruling is oblique.
    pub fn position(&self) -> f64 {
        self.try_position().unwrap_or_else(|e| panic!("{e}"))
    }

    /// # Panics
    ///
    /// Panics if the ruling is oblique.
    pub fn start(&self) -> f64 {
        self.try_start().unwrap_or_else(|e| panic!("{e}"))
    }

    /// # Panics
    ///
    /// Panics if the ruling is oblique.
    pub fn end(&self) -> f64 {
        self.try_end().unwrap_or_else(|e| panic!("{e}"))
    }

    /// Same ruling with new extents along its axis.
    pub fn with_start_end(&self, start: f64, end: f64) -> Result<Ruling> {
        match self.orientation() {
            Orientation::Vertical => Ok(Self::raw(self.x1, start, self.x2, end)),
            Orientation::Horizontal => Ok(Self::raw(start, self.y1, end, self.y2)),
            Orientation::Oblique => Err(self.oblique_error()),
        }
    }

    /// Same ruling moved to a new position across its axis.
    pub fn with_position(&self, position: f64) -> Result<Ruling> {
        match self.orientation() {
            Orientation::Vertical => Ok(Self::raw(position, self.y1, position, self.y2)),
            Orientation::Horizontal => Ok(Self::raw(self.x1, position, self.x2, position)),
            Orientation::Oblique => Err(self.oblique_error()),
        }
    }

    /// Lengthen the ruling by `amount` at both ends. Oblique rulings are returned unchanged.
    pub fn expand(&self, amount: f64) -> Ruling {
        match (self.try_start(), self.try_end()) {
            (Ok(start), Ok(end)) => self
                .with_start_end(start - amount, end + amount)
                .unwrap_or(*self),
            _ => {
                warn!(ruling = ?self, "could not expand oblique ruling");
                *self
            }
        }
    }

    pub fn perpendicular_to(&self, other: &Ruling) -> bool {
        self.vertical() == other.horizontal()
    }

    /// Whether `point` lies within the ruling's bounding extents.
    pub fn colinear(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    /// Exact segment intersection, endpoints and colinear overlap included.
    pub fn intersects_line(&self, other: &Ruling) -> bool {
        lines_intersect(
            (self.x1, self.y1, self.x2, self.y2),
            (other.x1, other.y1, other.x2, other.y2),
        )
    }

    pub fn nearly_intersects(&self, other: &Ruling) -> bool {
        self.nearly_intersects_with(other, COLINEAR_OR_PARALLEL_PIXEL_EXPAND_AMOUNT)
    }

    /// Intersection test with expansion: perpendicular rulings expand only
    /// `self` by [`PERPENDICULAR_PIXEL_EXPAND_AMOUNT`]; colinear or parallel
    /// ones expand both sides by `colinear_expand`.
    pub fn nearly_intersects_with(&self, other: &Ruling, colinear_expand: f64) -> bool {
        if self.intersects_line(other) {
            return true;
        }
        if self.perpendicular_to(other) {
            self.expand(PERPENDICULAR_PIXEL_EXPAND_AMOUNT)
                .intersects_line(other)
        } else {
            self.expand(colinear_expand)
                .intersects_line(&other.expand(colinear_expand))
        }
    }

    /// Crossing point of a horizontal and a vertical ruling, each expanded by
    /// [`PERPENDICULAR_PIXEL_EXPAND_AMOUNT`]. `Ok(None)` when they do not cross.
    pub fn intersection_point(&self, other: &Ruling) -> Result<Option<Point>> {
        let this_l = self.expand(PERPENDICULAR_PIXEL_EXPAND_AMOUNT);
        let other_l = other.expand(PERPENDICULAR_PIXEL_EXPAND_AMOUNT);
        let (horizontal, vertical) = if this_l.horizontal() && other_l.vertical() {
            (this_l, other_l)
        } else if this_l.vertical() && other_l.horizontal() {
            (other_l, this_l)
        } else {
            return Err(TableError::NotPerpendicular);
        };
        if !this_l.intersects_line(&other_l) {
            return Ok(None);
        }
        Ok(Some(Point::new(vertical.left(), horizontal.top())))
    }

    /// Whether any part of the segment lies inside `area` (boundary inclusive).
    pub fn intersects_rect(&self, area: &Rectangle) -> bool {
        clip_line(area, self.p1(), self.p2()).is_some()
    }

    /// The part of the ruling inside `area`; the ruling itself when it misses.
    pub fn clip_to(&self, area: &Rectangle) -> Ruling {
        match clip_line(area, self.p1(), self.p2()) {
            Some((p1, p2)) => Ruling::new(p1, p2),
            None => *self,
        }
    }
}

/// Sign of the turn from segment `(x1,y1)-(x2,y2)` to point `(px,py)`:
/// 0 when the point lies on the segment.
fn relative_ccw(x1: f64, y1: f64, x2: f64, y2: f64, px: f64, py: f64) -> i32 {
    let (x2, y2) = (x2 - x1, y2 - y1);
    let (mut px, mut py) = (px - x1, py - y1);
    let mut ccw = px * y2 - py * x2;
    if ccw == 0.0 {
        ccw = px * x2 + py * y2;
        if ccw > 0.0 {
            px -= x2;
            py -= y2;
            ccw = px * x2 + py * y2;
            if ccw < 0.0 {
                ccw = 0.0;
            }
        }
    }
    if ccw < 0.0 {
        -1
    } else if ccw > 0.0 {
        1
    } else {
        0
    }
}

fn lines_intersect(a: (f64, f64, f64, f64), b: (f64, f64, f64, f64)) -> bool {
    let (x1, y1, x2, y2) = a;
    let (x3, y3, x4, y4) = b;
    relative_ccw(x1, y1, x2, y2, x3, y3) * relative_ccw(x1, y1, x2, y2, x4, y4) <= 0
        && relative_ccw(x3, y3, x4, y4, x1, y1) * relative_ccw(x3, y3, x4, y4, x2, y2) <= 0
}
