use knightpath_core::Point;

use crate::PathRange;
use crate::pathrange::{NO_PARENT, PathNode, UNREACHABLE};
use crate::traits::Pather;

impl PathRange {
    /// Compute a multi-source breadth-first search distance map.
    ///
    /// Each step has cost 1. Expansion stops when the distance exceeds
    /// `max_dist`. Returns a slice of all reached nodes in visit order.
    pub fn bfs_map<P: Pather>(
        &mut self,
        pather: &P,
        sources: &[Point],
        max_dist: i32,
    ) -> &[PathNode] {
        self.reset_bfs();

        for &src in sources {
            if let Some(si) = self.idx(src) {
                if self.bfs_map[si] != UNREACHABLE {
                    continue;
                }
                self.bfs_map[si] = 0;
                self.bfs_queue.push_back(si);
                self.bfs_results.push(PathNode { pos: src, cost: 0 });
            }
        }

        self.expand(pather, None, max_dist);
        &self.bfs_results
    }

    /// Find one shortest path from `from` to `to`.
    ///
    /// The search stops as soon as `to` is dequeued. The returned path runs
    /// from `from` to `to` inclusive; `None` means `to` cannot be reached
    /// (or either endpoint lies outside the range).
    pub fn bfs_path<P: Pather>(&mut self, pather: &P, from: Point, to: Point) -> Option<Vec<Point>> {
        self.reset_bfs();

        let fi = self.idx(from)?;
        let ti = self.idx(to)?;

        self.bfs_map[fi] = 0;
        self.bfs_queue.push_back(fi);
        self.bfs_results.push(PathNode { pos: from, cost: 0 });

        if !self.expand(pather, Some(ti), UNREACHABLE - 1) {
            return None;
        }

        let mut path = Vec::with_capacity(self.bfs_map[ti] as usize + 1);
        let mut i = ti;
        while i != NO_PARENT {
            path.push(self.point(i));
            i = self.bfs_parent[i];
        }
        path.reverse();
        Some(path)
    }

    /// Query the BFS distance at a specific point.
    ///
    /// Returns [`UNREACHABLE`] if the point is outside the range or was not
    /// reached by the last query.
    pub fn bfs_at(&self, p: Point) -> i32 {
        match self.idx(p) {
            Some(i) => self.bfs_map[i],
            None => UNREACHABLE,
        }
    }

    /// Drain the queue, recording distance and predecessor of every newly
    /// reached node. Returns `true` if `target` was dequeued.
    fn expand<P: Pather>(&mut self, pather: &P, target: Option<usize>, max_dist: i32) -> bool {
        let mut nbuf = std::mem::take(&mut self.nbuf);
        let mut found = false;

        while let Some(ci) = self.bfs_queue.pop_front() {
            if Some(ci) == target {
                found = true;
                break;
            }
            let current_dist = self.bfs_map[ci];
            let cp = self.point(ci);

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.bfs_map[ni] != UNREACHABLE {
                    continue;
                }
                let nd = current_dist + 1;
                if nd > max_dist {
                    continue;
                }
                self.bfs_map[ni] = nd;
                self.bfs_parent[ni] = ci;
                self.bfs_queue.push_back(ni);
                self.bfs_results.push(PathNode { pos: np, cost: nd });
            }
        }

        self.nbuf = nbuf;
        found
    }
}
