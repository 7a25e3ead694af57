//! Ruling clean-up: endpoint snapping, collapsing of overlapping rulings,
//! and the supplementary ruling sources (rectangles, polylines, cropping).

use std::cmp::Ordering;

use tracing::debug;

use crate::geometry::{COLINEAR_OR_PARALLEL_PIXEL_EXPAND_AMOUNT, Point, Rectangle, Ruling};
use crate::utils::{cmp_f64, feq};

/// Horizontal and vertical rulings after snapping and collapsing.
///
/// The two sets are disjoint and contain no oblique or zero-length rulings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessedRulings {
    pub horizontal: Vec<Ruling>,
    pub vertical: Vec<Ruling>,
}

impl ProcessedRulings {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }

    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    /// Horizontal rulings followed by vertical ones.
    pub fn all(&self) -> Vec<Ruling> {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .copied()
            .collect()
    }
}

/// Replace each coordinate in a cluster with the cluster mean.
///
/// Clusters are formed over the sorted values, comparing every value with the
/// first value of the cluster.
fn snap_axis(values: &mut [f64], tolerance: f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| cmp_f64(values[a], values[b]));

    let mut start = 0usize;
    while start < order.len() {
        let anchor = values[order[start]];
        let mut end = start + 1;
        while end < order.len() && (values[order[end]] - anchor).abs() < tolerance {
            end += 1;
        }
        let members = &order[start..end];
        let mean = members.iter().map(|&i| values[i]).sum::<f64>() / members.len() as f64;
        for &i in members {
            values[i] = mean;
        }
        start = end;
    }
}

/// Snap ruling endpoints that lie within `x_tolerance` / `y_tolerance` of each
/// other onto a shared coordinate, independently per axis.
///
/// Returns new rulings rebuilt from the snapped endpoints, one per input ruling.
pub fn snap_points(rulings: &[Ruling], x_tolerance: f64, y_tolerance: f64) -> Vec<Ruling> {
    // endpoint 2i is p1 of ruling i, 2i + 1 is p2
    let points: Vec<Point> = rulings.iter().flat_map(|r| [r.p1(), r.p2()]).collect();
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    snap_axis(&mut xs, x_tolerance);
    snap_axis(&mut ys, y_tolerance);

    (0..rulings.len())
        .map(|i| {
            Ruling::new(
                Point::new(xs[2 * i], ys[2 * i]),
                Point::new(xs[2 * i + 1], ys[2 * i + 1]),
            )
        })
        .collect()
}

/// Merge rulings of one orientation that share a position and nearly touch.
///
/// Oblique and zero-length rulings never survive. The result is sorted by
/// position, then start. Collapsing an already collapsed set is a no-op.
pub fn collapse_oriented_rulings(rulings: &[Ruling], expand_amount: f64) -> Vec<Ruling> {
    let mut sorted: Vec<Ruling> = rulings.iter().filter(|r| !r.oblique()).copied().collect();
    sorted.sort_by(|a, b| match cmp_f64(a.position(), b.position()) {
        Ordering::Equal => cmp_f64(a.start(), b.start()),
        ord => ord,
    });

    let mut out: Vec<Ruling> = Vec::with_capacity(sorted.len());
    for next in sorted {
        let merges = out.last().is_some_and(|last| {
            feq(next.position(), last.position())
                && last.nearly_intersects_with(&next, expand_amount)
        });
        if let (true, Some(last)) = (merges, out.last_mut()) {
            let (last_start, last_end) = (last.start(), last.end());
            let last_flipped = last_start > last_end;
            let next_flipped = next.start() > next.end();
            let (next_start, next_end) = if next_flipped != last_flipped {
                (next.end(), next.start())
            } else {
                (next.start(), next.end())
            };
            let (new_start, new_end) = if last_flipped {
                (next_start.max(last_start), next_end.min(last_end))
            } else {
                (next_start.min(last_start), next_end.max(last_end))
            };
            if let Ok(merged) = last.with_start_end(new_start, new_end) {
                *last = merged;
            }
            continue;
        }
        out.push(next);
    }
    out
}

/// Snap, split by orientation and collapse a page's raw rulings.
///
/// `snap_tolerance` is the (x, y) snapping tolerance, normally the page's
/// smallest glyph width and height; `None` skips snapping.
pub fn process_rulings(rulings: &[Ruling], snap_tolerance: Option<(f64, f64)>) -> ProcessedRulings {
    if rulings.is_empty() {
        return ProcessedRulings::default();
    }

    let snapped = match snap_tolerance {
        Some((x_tol, y_tol)) => snap_points(rulings, x_tol, y_tol),
        None => rulings.to_vec(),
    };
    let horizontal: Vec<Ruling> = snapped.iter().filter(|r| r.horizontal()).copied().collect();
    let vertical: Vec<Ruling> = snapped.iter().filter(|r| r.vertical()).copied().collect();

    let processed = ProcessedRulings {
        horizontal: collapse_oriented_rulings(&horizontal, COLINEAR_OR_PARALLEL_PIXEL_EXPAND_AMOUNT),
        vertical: collapse_oriented_rulings(&vertical, COLINEAR_OR_PARALLEL_PIXEL_EXPAND_AMOUNT),
    };
    debug!(
        raw = rulings.len(),
        horizontal_before = horizontal.len(),
        vertical_before = vertical.len(),
        horizontal_after = processed.horizontal.len(),
        vertical_after = processed.vertical.len(),
        "processed rulings"
    );
    processed
}

/// The four borders of a rectangle: top, right, bottom, left.
pub fn rulings_from_rectangle(rect: &Rectangle) -> [Ruling; 4] {
    [
        Ruling::horizontal_at(rect.top, rect.left, rect.right()),
        Ruling::vertical_at(rect.right(), rect.top, rect.bottom()),
        Ruling::horizontal_at(rect.bottom(), rect.left, rect.right()),
        Ruling::vertical_at(rect.left, rect.top, rect.bottom()),
    ]
}

/// One ruling per segment of an open polyline. Zero-length segments are skipped.
pub fn rulings_from_polyline(points: &[Point]) -> Vec<Ruling> {
    points
        .windows(2)
        .map(|w| Ruling::new(w[0], w[1]))
        .filter(|r| r.length() > 0.0)
        .collect()
}

/// Rulings touching `area`, clipped to it.
pub fn crop_rulings_to_area(rulings: &[Ruling], area: &Rectangle) -> Vec<Ruling> {
    rulings
        .iter()
        .filter(|r| r.intersects_rect(area))
        .map(|r| r.clip_to(area))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_pulls_endpoints_together() {
        let rulings = vec![
            Ruling::horizontal_at(10.0, 0.0, 100.0),
            Ruling::vertical_at(100.4, 10.2, 50.0),
        ];
        let snapped = snap_points(&rulings, 1.0, 1.0);
        assert_eq!(snapped[0].right(), snapped[1].left());
        assert_eq!(snapped[0].top(), snapped[1].top());
    }

    #[test]
    fn snapping_leaves_distant_points() {
        let rulings = vec![
            Ruling::horizontal_at(10.0, 0.0, 100.0),
            Ruling::horizontal_at(20.0, 0.0, 100.0),
        ];
        assert_eq!(snap_points(&rulings, 1.0, 1.0), rulings);
    }

    #[test]
    fn collapse_merges_overlapping_pieces() {
        let rulings = vec![
            Ruling::horizontal_at(10.0, 50.0, 100.0),
            Ruling::horizontal_at(10.0, 0.0, 60.0),
            Ruling::horizontal_at(30.0, 0.0, 100.0),
        ];
        let collapsed = collapse_oriented_rulings(&rulings, 1.0);
        assert_eq!(
            collapsed,
            vec![
                Ruling::horizontal_at(10.0, 0.0, 100.0),
                Ruling::horizontal_at(30.0, 0.0, 100.0),
            ]
        );
    }

    #[test]
    fn collapse_joins_pieces_within_expansion() {
        let rulings = vec![
            Ruling::vertical_at(5.0, 0.0, 10.0),
            Ruling::vertical_at(5.0, 11.5, 20.0),
        ];
        let collapsed = collapse_oriented_rulings(&rulings, 1.0);
        assert_eq!(collapsed, vec![Ruling::vertical_at(5.0, 0.0, 20.0)]);
    }

    #[test]
    fn collapse_keeps_distant_pieces() {
        let rulings = vec![
            Ruling::vertical_at(5.0, 0.0, 10.0),
            Ruling::vertical_at(5.0, 20.0, 30.0),
        ];
        assert_eq!(collapse_oriented_rulings(&rulings, 1.0).len(), 2);
    }

    #[test]
    fn collapse_drops_zero_length() {
        let rulings = vec![Ruling::new(Point::new(3.0, 3.0), Point::new(3.0, 3.0))];
        assert!(collapse_oriented_rulings(&rulings, 1.0).is_empty());
    }

    #[test]
    fn rectangle_borders() {
        let rect = Rectangle::new(10.0, 20.0, 30.0, 40.0);
        let [top, right, bottom, left] = rulings_from_rectangle(&rect);
        assert!(top.horizontal() && bottom.horizontal());
        assert!(left.vertical() && right.vertical());
        assert_eq!(top.position(), 10.0);
        assert_eq!(bottom.position(), 50.0);
        assert_eq!(left.position(), 20.0);
        assert_eq!(right.position(), 50.0);
    }

    #[test]
    fn polyline_segments() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let rulings = rulings_from_polyline(&points);
        assert_eq!(rulings.len(), 2);
        assert!(rulings[0].horizontal());
        assert!(rulings[1].vertical());
    }

    #[test]
    fn cropping_clips_and_filters() {
        let area = Rectangle::new(0.0, 0.0, 50.0, 50.0);
        let rulings = vec![
            Ruling::horizontal_at(10.0, -20.0, 80.0),
            Ruling::horizontal_at(70.0, 0.0, 50.0),
        ];
        let cropped = crop_rulings_to_area(&rulings, &area);
        assert_eq!(cropped, vec![Ruling::horizontal_at(10.0, 0.0, 50.0)]);
    }
}
