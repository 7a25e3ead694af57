//! Bulk-loaded spatial index over caller-owned rectangles.
//!
//! The index stores only geometry. Queries answer with positions into the
//! slice the index was built from, so payloads stay with the caller and keep
//! their insertion-derived identity.

use geo_index::rtree::sort::HilbertSort;
use geo_index::rtree::{RTree, RTreeBuilder, RTreeIndex};

use crate::geometry::{HasRectangle, Rectangle, reading_order};
use crate::utils::sort_tolerant;

/// Packed R-tree (Hilbert order) built once per page.
pub struct SpatialIndex {
    rects: Vec<Rectangle>,
    tree: Option<RTree<f64>>,
    bounds: Rectangle,
}

impl SpatialIndex {
    /// Bulk-load the rectangles of `items`. Entry `i` refers to `items[i]`.
    pub fn build<T: HasRectangle>(items: &[T]) -> Self {
        let rects: Vec<Rectangle> = items.iter().map(HasRectangle::rectangle).collect();
        let bounds = Rectangle::bounding_box_of(&rects).unwrap_or_default();
        if rects.is_empty() {
            return Self {
                rects,
                tree: None,
                bounds,
            };
        }

        let mut builder: RTreeBuilder<f64> = RTreeBuilder::new(rects.len() as u32);
        for r in &rects {
            builder.add(r.left, r.top, r.right(), r.bottom());
        }
        Self {
            rects,
            tree: Some(builder.finish::<HilbertSort>()),
            bounds,
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Union of every indexed rectangle; the zero rectangle when empty.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Rectangle stored for entry `id`.
    pub fn rect(&self, id: usize) -> Rectangle {
        self.rects[id]
    }

    fn candidates(&self, area: &Rectangle) -> Vec<usize> {
        match &self.tree {
            Some(tree) => tree
                .search(area.left, area.top, area.right(), area.bottom())
                .into_iter()
                .map(|id| id as usize)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Entries overlapping `area` (boundary contact included), in no particular order.
    pub fn intersects(&self, area: &Rectangle) -> Vec<usize> {
        self.candidates(area)
    }

    /// Entries lying fully inside `area`, in reading order.
    pub fn contains(&self, area: &Rectangle) -> Vec<usize> {
        let mut ids = self.query(area, |area, rect| area.contains(rect));
        sort_tolerant(&mut ids, |a, b| reading_order(&self.rects[*a], &self.rects[*b]));
        ids
    }

    /// Candidates intersecting `area`, filtered by `pred(area, entry_rect)`.
    ///
    /// Results are ordered by entry id.
    pub fn query<F>(&self, area: &Rectangle, mut pred: F) -> Vec<usize>
    where
        F: FnMut(&Rectangle, &Rectangle) -> bool,
    {
        let mut ids: Vec<usize> = self
            .candidates(area)
            .into_iter()
            .filter(|id| pred(area, &self.rects[*id]))
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<Rectangle> {
        let mut out = Vec::new();
        for row in 0..n {
            for col in 0..n {
                out.push(Rectangle::new(
                    row as f64 * 10.0,
                    col as f64 * 10.0,
                    8.0,
                    8.0,
                ));
            }
        }
        out
    }

    #[test]
    fn empty_index_answers_nothing() {
        let index = SpatialIndex::build::<Rectangle>(&[]);
        assert!(index.is_empty());
        assert_eq!(index.bounds(), Rectangle::default());
        assert!(index.contains(&Rectangle::new(0.0, 0.0, 100.0, 100.0)).is_empty());
    }

    #[test]
    fn contains_returns_reading_order() {
        let rects = grid(4);
        let index = SpatialIndex::build(&rects);
        let ids = index.contains(&Rectangle::new(0.0, 0.0, 19.0, 19.0));
        // (row 0, col 0), (row 0, col 1), (row 1, col 0), (row 1, col 1)
        assert_eq!(ids, vec![0, 1, 4, 5]);
    }

    #[test]
    fn intersects_includes_partial_overlap() {
        let rects = grid(3);
        let index = SpatialIndex::build(&rects);
        let mut ids = index.intersects(&Rectangle::new(5.0, 5.0, 2.0, 2.0));
        ids.sort_unstable();
        assert_eq!(ids, vec![0]);
        let mut ids = index.intersects(&Rectangle::new(5.0, 5.0, 10.0, 10.0));
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 3, 4]);
    }

    #[test]
    fn query_applies_custom_predicate() {
        let rects = grid(3);
        let index = SpatialIndex::build(&rects);
        let area = Rectangle::new(0.0, 0.0, 30.0, 30.0);
        let ids = index.query(&area, |_, r| r.left >= 10.0);
        assert_eq!(ids, vec![1, 2, 4, 5, 7, 8]);
    }

    #[test]
    fn bounds_cover_all_entries() {
        let index = SpatialIndex::build(&grid(2));
        assert_eq!(index.bounds(), Rectangle::new(0.0, 0.0, 18.0, 18.0));
    }
}
