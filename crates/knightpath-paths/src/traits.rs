use knightpath_core::Point;

/// Minimal pathfinding interface — provides neighbor enumeration.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    ///
    /// Neighbors are explored in the order they are appended, which decides
    /// the predecessor kept for nodes reachable by several shortest paths.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}
