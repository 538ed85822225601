//! Breadth-first pathfinding for the knight's move graph.
//!
//! - **BFS distance maps** over any [`Pather`] ([`PathRange::bfs_map`])
//! - **BFS single-target paths** with predecessor reconstruction
//!   ([`PathRange::bfs_path`])
//! - **Knight shortest paths** on the 8×8 board ([`shortest_path`],
//!   [`shortest_path_str`]) and full distance maps ([`distance_map`])
//!
//! The knight functions are pure: each call builds its own [`PathRange`]
//! and drops it on return, so concurrent callers share nothing.

mod bfs;
mod knight;
mod neighbors;
mod pathrange;
mod traits;

pub use knight::{
    DistanceMap, KnightBoard, KnightPath, distance_map, shortest_path, shortest_path_str,
};
pub use neighbors::knight_neighbors;
pub use pathrange::{PathNode, PathRange, UNREACHABLE};
pub use traits::Pather;
