//! Sweep-line search for crossings of horizontal and vertical rulings.
//!
//! Events are ordered along x. Horizontal rulings enter the active set a
//! little before their left end and leave a little after their right end;
//! every vertical ruling is tested against the active set only.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::geometry::{PERPENDICULAR_PIXEL_EXPAND_AMOUNT, Point, Ruling, y_first_point_order};
use crate::utils::{KeyF64, KeyPoint, cmp_f64, feq, key_f64, sort_tolerant};

/// A crossing point with the (expanded) rulings that meet there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    pub point: Point,
    pub horizontal: Ruling,
    pub vertical: Ruling,
}

/// Crossings keyed by their exact point.
#[derive(Clone, Debug, Default)]
pub struct Intersections {
    crossings: FxHashMap<KeyPoint, Crossing>,
}

impl Intersections {
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    pub fn get(&self, point: &Point) -> Option<&Crossing> {
        self.crossings.get(&point.key())
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.crossings.contains_key(&point.key())
    }

    /// Every crossing point, ordered by y then x.
    pub fn points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.crossings.values().map(|c| c.point).collect();
        // exact order first so ties under tolerance resolve deterministically
        points.sort_by(|a, b| cmp_f64(a.y, b.y).then(cmp_f64(a.x, b.x)));
        sort_tolerant(&mut points, y_first_point_order);
        points
    }
}

/// Find every point where a horizontal ruling crosses a vertical one.
pub fn find_intersections(horizontals: &[Ruling], verticals: &[Ruling]) -> Intersections {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum EventKind {
        HLeft,
        Vertical,
        HRight,
    }

    struct Event {
        x: f64,
        kind: EventKind,
        idx: usize,
    }

    let horizontals: Vec<&Ruling> = horizontals.iter().filter(|r| r.horizontal()).collect();
    let verticals: Vec<&Ruling> = verticals.iter().filter(|r| r.vertical()).collect();

    let mut events = Vec::with_capacity(horizontals.len() * 2 + verticals.len());
    for (idx, h) in horizontals.iter().enumerate() {
        let (left, right) = (h.left().min(h.right()), h.left().max(h.right()));
        events.push(Event {
            x: left - PERPENDICULAR_PIXEL_EXPAND_AMOUNT,
            kind: EventKind::HLeft,
            idx,
        });
        events.push(Event {
            x: right + PERPENDICULAR_PIXEL_EXPAND_AMOUNT,
            kind: EventKind::HRight,
            idx,
        });
    }
    for (idx, v) in verticals.iter().enumerate() {
        events.push(Event {
            x: v.left(),
            kind: EventKind::Vertical,
            idx,
        });
    }

    // Within tolerance a horizontal is entered before and left after any
    // vertical at the same x.
    sort_tolerant(&mut events, |a, b| {
        if feq(a.x, b.x) {
            match (a.kind, b.kind) {
                (EventKind::Vertical, EventKind::HLeft) => return Ordering::Greater,
                (EventKind::Vertical, EventKind::HRight) => return Ordering::Less,
                (EventKind::HLeft, EventKind::Vertical) => return Ordering::Less,
                (EventKind::HRight, EventKind::Vertical) => return Ordering::Greater,
                _ => {}
            }
        }
        cmp_f64(a.x, b.x)
    });

    let mut active: BTreeSet<(KeyF64, usize)> = BTreeSet::new();
    let mut crossings: FxHashMap<KeyPoint, Crossing> = FxHashMap::default();

    for event in events {
        match event.kind {
            EventKind::HLeft => {
                active.insert((key_f64(horizontals[event.idx].top()), event.idx));
            }
            EventKind::HRight => {
                active.remove(&(key_f64(horizontals[event.idx].top()), event.idx));
            }
            EventKind::Vertical => {
                let v = verticals[event.idx];
                for &(_, h_idx) in &active {
                    let h = horizontals[h_idx];
                    let Ok(Some(point)) = h.intersection_point(v) else {
                        continue;
                    };
                    crossings.insert(
                        point.key(),
                        Crossing {
                            point,
                            horizontal: h.expand(PERPENDICULAR_PIXEL_EXPAND_AMOUNT),
                            vertical: v.expand(PERPENDICULAR_PIXEL_EXPAND_AMOUNT),
                        },
                    );
                }
            }
        }
    }

    debug!(
        horizontal = horizontals.len(),
        vertical = verticals.len(),
        intersections = crossings.len(),
        "found ruling intersections"
    );
    Intersections { crossings }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_grid() {
        let h = vec![
            Ruling::horizontal_at(0.0, 0.0, 10.0),
            Ruling::horizontal_at(10.0, 0.0, 10.0),
        ];
        let v = vec![
            Ruling::vertical_at(0.0, 0.0, 10.0),
            Ruling::vertical_at(10.0, 0.0, 10.0),
        ];
        let found = find_intersections(&h, &v);
        assert_eq!(found.len(), 4);
        assert_eq!(
            found.points(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn near_miss_within_expansion_counts() {
        let h = vec![Ruling::horizontal_at(5.0, 0.0, 9.0)];
        let v = vec![Ruling::vertical_at(10.5, 0.0, 20.0)];
        let found = find_intersections(&h, &v);
        assert_eq!(found.points(), vec![Point::new(10.5, 5.0)]);
    }

    #[test]
    fn far_apart_rulings_do_not_cross() {
        let h = vec![Ruling::horizontal_at(5.0, 0.0, 9.0)];
        let v = vec![Ruling::vertical_at(20.0, 0.0, 20.0)];
        assert!(find_intersections(&h, &v).is_empty());
    }

    #[test]
    fn rulings_sharing_a_top_are_both_active() {
        let h = vec![
            Ruling::horizontal_at(5.0, 0.0, 50.0),
            Ruling::horizontal_at(5.0, 100.0, 150.0),
        ];
        let v = vec![
            Ruling::vertical_at(25.0, 0.0, 10.0),
            Ruling::vertical_at(125.0, 0.0, 10.0),
        ];
        let found = find_intersections(&h, &v);
        assert_eq!(found.len(), 2);
        let crossing = found.get(&Point::new(125.0, 5.0)).unwrap();
        assert_eq!(crossing.horizontal, h[1].expand(2.0));
    }
}
