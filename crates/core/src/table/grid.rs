//! Cells from ruling crossings, and table regions from cells.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use crate::geometry::{
    Point, Rectangle, Ruling, sort_by_reading_order, x_first_point_order, y_first_point_order,
};
use crate::utils::{KeyPoint, cmp_f64, feq, sort_tolerant};

use super::intersections::find_intersections;
use super::types::Cell;

/// Find the smallest ruled rectangles in a set of horizontal and vertical rulings.
///
/// For each crossing, the first crossing below it on the same vertical ruling
/// and the first to its right on the same horizontal ruling that close a
/// rectangle with an existing bottom-right crossing define one cell.
pub fn find_cells(horizontals: &[Ruling], verticals: &[Ruling]) -> Vec<Cell> {
    let intersections = find_intersections(horizontals, verticals);
    let points = intersections.points();

    let mut cells = Vec::new();
    for (i, top_left) in points.iter().enumerate() {
        let Some(corner) = intersections.get(top_left) else {
            continue;
        };

        let mut below: Vec<&Point> = Vec::new();
        let mut right: Vec<&Point> = Vec::new();
        for p in &points[i..] {
            if p.x == top_left.x && p.y > top_left.y {
                below.push(p);
            }
            if p.y == top_left.y && p.x > top_left.x {
                right.push(p);
            }
        }

        'search: for b in &below {
            let Some(below_crossing) = intersections.get(b) else {
                continue;
            };
            if below_crossing.vertical != corner.vertical {
                continue;
            }
            for r in &right {
                let Some(right_crossing) = intersections.get(r) else {
                    continue;
                };
                if right_crossing.horizontal != corner.horizontal {
                    continue;
                }
                let bottom_right = Point::new(r.x, b.y);
                let Some(closing) = intersections.get(&bottom_right) else {
                    continue;
                };
                if closing.horizontal == below_crossing.horizontal
                    && closing.vertical == right_crossing.vertical
                {
                    cells.push(Cell::from_points(*top_left, bottom_right));
                    break 'search;
                }
            }
        }
    }

    debug!(
        intersections = intersections.len(),
        cells = cells.len(),
        "found cells"
    );
    cells
}

/// Pair consecutive points of the same row (or column) into edges.
///
/// `same_line` decides whether two sorted points share a row/column.
fn pair_edges<F>(points: &[Point], same_line: F) -> BTreeMap<KeyPoint, Point>
where
    F: Fn(&Point, &Point) -> bool,
{
    let mut edges = BTreeMap::new();
    let mut i = 0usize;
    while i + 1 < points.len() {
        let (a, b) = (points[i], points[i + 1]);
        if same_line(&a, &b) {
            edges.insert(a.key(), b);
            edges.insert(b.key(), a);
            i += 2;
        } else {
            trace!(point = ?a, "unpaired boundary point");
            i += 1;
        }
    }
    edges
}

#[derive(Clone, Copy, PartialEq)]
enum EdgeKind {
    Horizontal,
    Vertical,
}

/// Follow alternating horizontal and vertical edges from `start` until the
/// path closes. `None` when the chain breaks.
fn trace_polygon(
    start: Point,
    edges_h: &mut BTreeMap<KeyPoint, Point>,
    edges_v: &mut BTreeMap<KeyPoint, Point>,
) -> Option<Vec<Point>> {
    let mut polygon = vec![(start, EdgeKind::Horizontal)];
    edges_h.remove(&start.key());

    // every step visits a new boundary point, so this bounds the walk
    let limit = edges_h.len() + edges_v.len() + 2;
    for _ in 0..limit {
        let &(current, kind) = polygon.last()?;
        let (next, next_kind) = match kind {
            EdgeKind::Horizontal => (edges_v.remove(&current.key())?, EdgeKind::Vertical),
            EdgeKind::Vertical => (edges_h.remove(&current.key())?, EdgeKind::Horizontal),
        };
        if next == start {
            return Some(polygon.into_iter().map(|(p, _)| p).collect());
        }
        polygon.push((next, next_kind));
    }
    None
}

/// Group adjacent cells into table regions.
///
/// Corners shared by an even number of cells cancel out, leaving the
/// boundary points of each connected group of cells. The boundary is traced
/// into closed rectilinear polygons and each polygon's bounding box is one
/// region. Returned regions are in reading order.
pub fn find_spreadsheets_from_cells(cells: &[Rectangle]) -> Vec<Rectangle> {
    let mut unique: Vec<Rectangle> = Vec::with_capacity(cells.len());
    let mut seen: FxHashSet<(KeyPoint, KeyPoint)> = FxHashSet::default();
    for cell in cells {
        let key = (
            Point::new(cell.left, cell.top).key(),
            Point::new(cell.right(), cell.bottom()).key(),
        );
        if seen.insert(key) {
            unique.push(*cell);
        }
    }
    sort_by_reading_order(&mut unique);

    let mut boundary: FxHashSet<KeyPoint> = FxHashSet::default();
    for cell in &unique {
        for p in cell.points() {
            if !boundary.remove(&p.key()) {
                boundary.insert(p.key());
            }
        }
    }
    let mut points: Vec<Point> = boundary.iter().map(|(x, y)| Point::new(x.0, y.0)).collect();
    points.sort_by(|a, b| cmp_f64(a.x, b.x).then(cmp_f64(a.y, b.y)));

    let mut by_y = points.clone();
    sort_tolerant(&mut by_y, y_first_point_order);
    let mut by_x = points;
    sort_tolerant(&mut by_x, x_first_point_order);

    let mut edges_h = pair_edges(&by_y, |a, b| feq(a.y, b.y));
    let mut edges_v = pair_edges(&by_x, |a, b| feq(a.x, b.x));

    let mut regions = Vec::new();
    loop {
        let Some(key) = edges_h.first_key_value().map(|(k, _)| *k) else {
            break;
        };
        let start = Point::new(key.0.0, key.1.0);
        match trace_polygon(start, &mut edges_h, &mut edges_v) {
            Some(polygon) => {
                for p in &polygon {
                    edges_h.remove(&p.key());
                    edges_v.remove(&p.key());
                }
                if let Ok(region) = Rectangle::bounding_box_of(
                    polygon.iter().map(|p| Rectangle::new(p.y, p.x, 0.0, 0.0)),
                ) {
                    regions.push(region);
                }
            }
            None => {
                warn!(start = ?start, "abandoned open table boundary");
                edges_h.remove(&key);
            }
        }
    }
    sort_by_reading_order(&mut regions);

    debug!(
        cells = unique.len(),
        regions = regions.len(),
        "reconstructed table regions"
    );
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::HasRectangle;

    fn grid_rulings(xs: &[f64], ys: &[f64]) -> (Vec<Ruling>, Vec<Ruling>) {
        let (left, right) = (xs[0], xs[xs.len() - 1]);
        let (top, bottom) = (ys[0], ys[ys.len() - 1]);
        let h = ys
            .iter()
            .map(|&y| Ruling::horizontal_at(y, left, right))
            .collect();
        let v = xs
            .iter()
            .map(|&x| Ruling::vertical_at(x, top, bottom))
            .collect();
        (h, v)
    }

    #[test]
    fn two_cells_between_two_rows() {
        let (h, v) = grid_rulings(&[18.0, 70.0, 226.0], &[40.0, 80.0]);
        let cells: Vec<Rectangle> = find_cells(&h, &v).iter().map(|c| c.rectangle()).collect();
        assert_eq!(
            cells,
            vec![
                Rectangle::from_corners(18.0, 40.0, 70.0, 80.0),
                Rectangle::from_corners(70.0, 40.0, 226.0, 80.0),
            ]
        );
    }

    #[test]
    fn full_grid_gives_every_cell() {
        let (h, v) = grid_rulings(&[0.0, 10.0, 20.0, 30.0], &[0.0, 10.0, 20.0]);
        assert_eq!(find_cells(&h, &v).len(), 6);
    }

    #[test]
    fn missing_inner_ruling_makes_wide_cell() {
        let h = vec![
            Ruling::horizontal_at(0.0, 0.0, 20.0),
            Ruling::horizontal_at(10.0, 0.0, 20.0),
            Ruling::horizontal_at(20.0, 0.0, 20.0),
        ];
        let v = vec![
            Ruling::vertical_at(0.0, 0.0, 20.0),
            Ruling::vertical_at(10.0, 10.0, 20.0),
            Ruling::vertical_at(20.0, 0.0, 20.0),
        ];
        let cells: Vec<Rectangle> = find_cells(&h, &v).iter().map(|c| c.rectangle()).collect();
        assert_eq!(cells.len(), 3);
        assert!(cells.contains(&Rectangle::from_corners(0.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn no_rulings_no_cells() {
        assert!(find_cells(&[], &[]).is_empty());
    }

    #[test]
    fn adjacent_cells_form_one_region() {
        let cells = vec![
            Rectangle::from_corners(0.0, 0.0, 10.0, 10.0),
            Rectangle::from_corners(10.0, 0.0, 20.0, 10.0),
            Rectangle::from_corners(0.0, 10.0, 10.0, 20.0),
            Rectangle::from_corners(10.0, 10.0, 20.0, 20.0),
        ];
        assert_eq!(
            find_spreadsheets_from_cells(&cells),
            vec![Rectangle::from_corners(0.0, 0.0, 20.0, 20.0)]
        );
    }

    #[test]
    fn separate_groups_form_separate_regions() {
        let cells = vec![
            Rectangle::from_corners(0.0, 0.0, 10.0, 10.0),
            Rectangle::from_corners(10.0, 0.0, 20.0, 10.0),
            Rectangle::from_corners(0.0, 50.0, 10.0, 60.0),
        ];
        assert_eq!(
            find_spreadsheets_from_cells(&cells),
            vec![
                Rectangle::from_corners(0.0, 0.0, 20.0, 10.0),
                Rectangle::from_corners(0.0, 50.0, 10.0, 60.0),
            ]
        );
    }

    #[test]
    fn duplicate_cells_are_ignored() {
        let cell = Rectangle::from_corners(0.0, 0.0, 10.0, 10.0);
        assert_eq!(find_spreadsheets_from_cells(&[cell, cell]), vec![cell]);
    }

    #[test]
    fn l_shaped_group_bounds() {
        let cells = vec![
            Rectangle::from_corners(0.0, 0.0, 10.0, 10.0),
            Rectangle::from_corners(0.0, 10.0, 10.0, 20.0),
            Rectangle::from_corners(10.0, 10.0, 20.0, 20.0),
        ];
        assert_eq!(
            find_spreadsheets_from_cells(&cells),
            vec![Rectangle::from_corners(0.0, 0.0, 20.0, 20.0)]
        );
    }
}
