//! The fixed 8×8 board and the knight's move table.

use crate::geom::{Point, Range};

/// Number of files (and ranks) on the board.
pub const BOARD_SIZE: i32 = 8;

/// Every square of the board, a1 at the origin.
pub const BOARD: Range = Range::new(0, 0, BOARD_SIZE, BOARD_SIZE);

/// Knight displacements in `(Δfile, Δrank)` form.
///
/// The order is part of the solver's contract: when several shortest paths
/// exist, breadth-first search keeps the first predecessor discovered in
/// this order, which fixes the exact path callers observe.
pub const KNIGHT_OFFSETS: [Point; 8] = [
    Point::new(2, -1),
    Point::new(2, 1),
    Point::new(-2, 1),
    Point::new(-2, -1),
    Point::new(1, 2),
    Point::new(1, -2),
    Point::new(-1, 2),
    Point::new(-1, -2),
];

/// Whether `p` lies on the board.
///
/// This is the only bounds check in the workspace; move generation and
/// square validation both go through it.
#[inline]
pub const fn on_board(p: Point) -> bool {
    BOARD.contains(p)
}

/// Whether `to` is one knight move away from `from`.
#[inline]
pub fn is_knight_move(from: Point, to: Point) -> bool {
    let d = to - from;
    KNIGHT_OFFSETS.contains(&d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_has_64_squares() {
        assert_eq!(BOARD.len(), 64);
        assert_eq!(BOARD.iter().filter(|&p| on_board(p)).count(), 64);
    }

    #[test]
    fn on_board_edges() {
        assert!(on_board(Point::new(0, 0)));
        assert!(on_board(Point::new(7, 7)));
        assert!(!on_board(Point::new(8, 0)));
        assert!(!on_board(Point::new(0, -1)));
        assert!(!on_board(Point::new(-2, 9)));
    }

    #[test]
    fn offsets_are_distinct_knight_jumps() {
        for (i, a) in KNIGHT_OFFSETS.iter().enumerate() {
            assert_eq!(a.x.abs() * a.y.abs(), 2, "{a:?} is not an L-shape");
            for b in &KNIGHT_OFFSETS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn knight_move_detection() {
        let a1 = Point::new(0, 0);
        assert!(is_knight_move(a1, Point::new(1, 2)));
        assert!(is_knight_move(a1, Point::new(2, 1)));
        assert!(!is_knight_move(a1, Point::new(1, 1)));
        assert!(!is_knight_move(a1, a1));
    }
}
