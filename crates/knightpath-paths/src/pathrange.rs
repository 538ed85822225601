use std::collections::VecDeque;

use knightpath_core::{Point, Range};

/// A position with an associated cost, returned from BFS map queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub pos: Point,
    pub cost: i32,
}

/// Sentinel value meaning "unreachable" in BFS maps.
///
/// Internal to the search state; public results translate it to `None`.
pub const UNREACHABLE: i32 = i32::MAX;

/// Parent index of a search root (or of a node not reached yet).
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// PathRange
// ---------------------------------------------------------------------------

/// Search state for breadth-first queries on a grid rectangle.
///
/// `PathRange` owns the per-node distance and predecessor arrays, the FIFO
/// queue and a neighbor scratch buffer. Every query resets them first, so a
/// `PathRange` can be reused, but the knight entry points build a fresh one
/// per call instead of sharing it.
pub struct PathRange {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    // BFS caches
    pub(crate) bfs_map: Vec<i32>,
    pub(crate) bfs_parent: Vec<usize>,
    pub(crate) bfs_queue: VecDeque<usize>,
    pub(crate) bfs_results: Vec<PathNode>,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl PathRange {
    /// Create a new `PathRange` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        let w = rng.width().max(0) as usize;
        let len = rng.len();
        Self {
            rng,
            width: w,
            bfs_map: vec![UNREACHABLE; len],
            bfs_parent: vec![NO_PARENT; len],
            bfs_queue: VecDeque::with_capacity(len),
            bfs_results: Vec::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The grid rectangle being used.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Mark every node unvisited and drop previous results.
    pub(crate) fn reset_bfs(&mut self) {
        self.bfs_map.fill(UNREACHABLE);
        self.bfs_parent.fill(NO_PARENT);
        self.bfs_queue.clear();
        self.bfs_results.clear();
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_point_round_trip() {
        let pr = PathRange::new(Range::new(2, 3, 6, 8));
        for p in pr.range() {
            let i = pr.idx(p).unwrap();
            assert_eq!(pr.point(i), p);
        }
        assert_eq!(pr.idx(Point::new(2, 3)), Some(0));
        assert_eq!(pr.idx(Point::new(6, 3)), None);
        assert_eq!(pr.idx(Point::new(1, 3)), None);
    }

    #[test]
    fn new_range_starts_unvisited() {
        let pr = PathRange::new(Range::new(0, 0, 8, 8));
        assert_eq!(pr.bfs_map.len(), 64);
        assert!(pr.bfs_map.iter().all(|&d| d == UNREACHABLE));
        assert!(pr.bfs_parent.iter().all(|&p| p == NO_PARENT));
    }
}
