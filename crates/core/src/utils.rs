//! Numeric helpers shared by every geometry comparison.
//!
//! Provides:
//! - the single engine-wide tolerance and the predicates built on it
//! - ordered keys for using floats in maps
//! - a sort that tolerates inconsistent comparators

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

/// Tolerance used by every snapping, collapsing and intersection decision.
pub const EPSILON: f64 = 0.01;

/// Float equality within [`EPSILON`].
#[inline]
pub fn feq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Whether `a` lies within `variance` of `b` (inclusive).
#[inline]
pub fn within(a: f64, b: f64, variance: f64) -> bool {
    (a - b).abs() <= variance
}

/// Whether two vertical extents given as (bottom, height) touch or overlap.
#[inline]
pub fn extents_overlap(bottom1: f64, height1: f64, bottom2: f64, height2: f64) -> bool {
    (bottom2 <= bottom1 && bottom2 >= bottom1 - height1)
        || (bottom1 <= bottom2 && bottom1 >= bottom2 - height2)
}

// Key types for ordered float maps
pub(crate) type KeyF64 = OrderedFloat<f64>;
pub(crate) type KeyPoint = (KeyF64, KeyF64);

#[inline]
pub(crate) fn key_f64(v: f64) -> KeyF64 {
    OrderedFloat(v)
}

#[inline]
pub(crate) fn key_point(x: f64, y: f64) -> KeyPoint {
    (OrderedFloat(x), OrderedFloat(y))
}

/// Compare two floats, treating NaN as equal to everything.
#[inline]
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Stable sort that stays well-defined when `cmp` is not a strict weak order.
///
/// The reading-order comparator is not transitive across rows that only
/// partially overlap, and `slice::sort_by` may panic on such comparators.
/// This is a bottom-up merge sort over indices: it always terminates, never
/// panics, and returns the same permutation for the same input.
pub fn sort_tolerant<T, F>(items: &mut Vec<T>, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = items.len();
    if n < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut buf: Vec<usize> = vec![0; n];
    let mut width = 1usize;
    while width < n {
        let mut start = 0usize;
        while start < n {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            let (mut i, mut j, mut k) = (start, mid, start);
            while i < mid && j < end {
                if cmp(&items[order[j]], &items[order[i]]) == Ordering::Less {
                    buf[k] = order[j];
                    j += 1;
                } else {
                    buf[k] = order[i];
                    i += 1;
                }
                k += 1;
            }
            buf[k..k + (mid - i)].copy_from_slice(&order[i..mid]);
            k += mid - i;
            buf[k..k + (end - j)].copy_from_slice(&order[j..end]);
            start = end;
        }
        std::mem::swap(&mut order, &mut buf);
        width *= 2;
    }

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(order.into_iter().filter_map(|idx| slots[idx].take()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feq_uses_engine_tolerance() {
        assert!(feq(1.0, 1.009));
        assert!(!feq(1.0, 1.011));
    }

    #[test]
    fn extents_overlap_touching_counts() {
        // bottoms 10 and 20, heights 10: [0,10] and [10,20] touch
        assert!(extents_overlap(10.0, 10.0, 20.0, 10.0));
        assert!(!extents_overlap(10.0, 5.0, 20.0, 5.0));
    }

    #[test]
    fn sort_tolerant_matches_total_order() {
        let mut v = vec![5, 3, 9, 1, 1, 8, 2, 7];
        sort_tolerant(&mut v, |a, b| a.cmp(b));
        assert_eq!(v, vec![1, 1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn sort_tolerant_is_stable() {
        let mut v = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        sort_tolerant(&mut v, |a, b| a.0.cmp(&b.0));
        assert_eq!(v, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }

    #[test]
    fn sort_tolerant_survives_cyclic_comparator() {
        // rock-paper-scissors: no total order exists
        let beats = |a: &u8, b: &u8| match (a, b) {
            (0, 1) | (1, 2) | (2, 0) => Ordering::Less,
            (1, 0) | (2, 1) | (0, 2) => Ordering::Greater,
            _ => Ordering::Equal,
        };
        let mut v: Vec<u8> = (0..60).map(|i| (i % 3) as u8).collect();
        sort_tolerant(&mut v, beats);
        assert_eq!(v.len(), 60);
        assert_eq!(v.iter().filter(|&&x| x == 0).count(), 20);
    }
}
