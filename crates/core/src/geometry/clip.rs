//! Cohen–Sutherland segment clipping against an axis-aligned rectangle.

use super::{Point, Rectangle};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const ABOVE: u8 = 4;
const BELOW: u8 = 8;

fn region_code(area: &Rectangle, x: f64, y: f64) -> u8 {
    let mut code = INSIDE;
    if x < area.left {
        code |= LEFT;
    } else if x > area.right() {
        code |= RIGHT;
    }
    if y < area.top {
        code |= ABOVE;
    } else if y > area.bottom() {
        code |= BELOW;
    }
    code
}

/// Clip the segment `p1 -> p2` to `area` (boundary inclusive).
///
/// Returns the visible part with endpoints in the original direction, or
/// `None` when the segment misses the rectangle entirely.
pub fn clip_line(area: &Rectangle, p1: Point, p2: Point) -> Option<(Point, Point)> {
    let (mut x1, mut y1, mut x2, mut y2) = (p1.x, p1.y, p2.x, p2.y);
    let mut code1 = region_code(area, x1, y1);
    let mut code2 = region_code(area, x2, y2);

    loop {
        if code1 | code2 == INSIDE {
            return Some((Point::new(x1, y1), Point::new(x2, y2)));
        }
        if code1 & code2 != INSIDE {
            return None;
        }

        let out = if code1 != INSIDE { code1 } else { code2 };
        let (x, y) = if out & BELOW != 0 {
            let y = area.bottom();
            (x1 + (x2 - x1) * (y - y1) / (y2 - y1), y)
        } else if out & ABOVE != 0 {
            let y = area.top;
            (x1 + (x2 - x1) * (y - y1) / (y2 - y1), y)
        } else if out & RIGHT != 0 {
            let x = area.right();
            (x, y1 + (y2 - y1) * (x - x1) / (x2 - x1))
        } else {
            let x = area.left;
            (x, y1 + (y2 - y1) * (x - x1) / (x2 - x1))
        };

        if out == code1 {
            x1 = x;
            y1 = y;
            code1 = region_code(area, x1, y1);
        } else {
            x2 = x;
            y2 = y;
            code2 = region_code(area, x2, y2);
        }
    }
}
