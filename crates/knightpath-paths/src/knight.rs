use std::fmt;

use knightpath_core::{BOARD, BOARD_SIZE, InvalidSquare, Point, Square, on_board};

use crate::neighbors::knight_neighbors;
use crate::pathrange::{PathRange, UNREACHABLE};
use crate::traits::Pather;

/// The knight's move graph on the empty 8×8 board.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnightBoard;

impl Pather for KnightBoard {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(knight_neighbors(p, on_board));
    }
}

/// Outcome of a shortest-path query.
///
/// `distance` is the number of moves, `None` when the target cannot be
/// reached; in that case `path` is empty. Otherwise `path` runs from source
/// to target inclusive and holds `distance + 1` squares.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnightPath {
    pub distance: Option<u32>,
    pub path: Vec<Square>,
}

impl KnightPath {
    /// The result for a target that was never reached.
    pub fn unreachable() -> Self {
        Self {
            distance: None,
            path: Vec::new(),
        }
    }

    /// Squares joined by `:`, e.g. `"a1:b3:d4"`. Empty when unreachable.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(Square::to_string)
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for KnightPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.distance {
            Some(d) => write!(f, "{d} moves: {}", self.path_string()),
            None => f.write_str("unreachable"),
        }
    }
}

/// Minimum number of knight moves from `source` to `target`, with one
/// shortest sequence of squares.
///
/// Among equally short paths the one returned is fixed by
/// [`KNIGHT_OFFSETS`](knightpath_core::KNIGHT_OFFSETS) order: each square
/// keeps the first predecessor that discovered it.
pub fn shortest_path(source: Square, target: Square) -> KnightPath {
    if source == target {
        return KnightPath {
            distance: Some(0),
            path: vec![source],
        };
    }

    let mut pr = PathRange::new(BOARD);
    let result = match pr.bfs_path(&KnightBoard, source.point(), target.point()) {
        Some(points) => KnightPath {
            distance: Some(points.len() as u32 - 1),
            path: points.into_iter().filter_map(Square::from_point).collect(),
        },
        None => KnightPath::unreachable(),
    };
    log::debug!("knight path {source} -> {target}: {result}");
    result
}

/// Like [`shortest_path`], for squares in their two-character text form.
///
/// The text must be exactly a lowercase file `a-h` followed by a rank
/// `1-8`; nothing is searched if either square is malformed.
pub fn shortest_path_str(source: &str, target: &str) -> Result<KnightPath, InvalidSquare> {
    let source: Square = source.parse()?;
    let target: Square = target.parse()?;
    Ok(shortest_path(source, target))
}

/// Knight distances from one square to every square of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    source: Square,
    distances: [Option<u32>; 64],
}

impl DistanceMap {
    /// The square distances are measured from.
    pub fn source(&self) -> Square {
        self.source
    }

    /// Moves needed to reach `sq`.
    pub fn get(&self, sq: Square) -> Option<u32> {
        self.distances[sq.rank() as usize * BOARD_SIZE as usize + sq.file() as usize]
    }

    /// The largest distance on the board.
    pub fn max(&self) -> Option<u32> {
        self.distances.iter().flatten().copied().max()
    }
}

impl fmt::Display for DistanceMap {
    /// Rank 8 at the top, files left to right, `.` for unreachable squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_SIZE as u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE as u8 {
                let cell = Square::new(file, rank).and_then(|sq| self.get(sq));
                match cell {
                    Some(d) => write!(f, " {d}")?,
                    None => f.write_str(" .")?,
                }
            }
            writeln!(f)?;
        }
        f.write_str("  ")?;
        for file in 'a'..='h' {
            write!(f, " {file}")?;
        }
        writeln!(f)
    }
}

/// Breadth-first distances from `source` to all 64 squares.
pub fn distance_map(source: Square) -> DistanceMap {
    let mut pr = PathRange::new(BOARD);
    pr.bfs_map(&KnightBoard, &[source.point()], BOARD.len() as i32);

    let mut distances = [None; 64];
    for sq in Square::all() {
        let d = pr.bfs_at(sq.point());
        if d != UNREACHABLE {
            distances[sq.rank() as usize * BOARD_SIZE as usize + sq.file() as usize] = Some(d as u32);
        }
    }
    DistanceMap { source, distances }
}

#[cfg(test)]
mod tests {
    use knightpath_core::is_knight_move;

    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn same_square_is_zero_moves() {
        for s in Square::all() {
            let r = shortest_path(s, s);
            assert_eq!(r.distance, Some(0));
            assert_eq!(r.path, vec![s]);
        }
        assert_eq!(shortest_path_str("a1", "a1").unwrap().path_string(), "a1");
    }

    #[test]
    fn single_move() {
        let r = shortest_path_str("a1", "b3").unwrap();
        assert_eq!(r.distance, Some(1));
        assert_eq!(r.path_string(), "a1:b3");
    }

    #[test]
    fn corner_to_corner() {
        let r = shortest_path_str("a1", "h8").unwrap();
        assert_eq!(r.distance, Some(6));
        assert_eq!(r.path.len(), 7);
        assert_eq!(r.path_string(), "a1:c2:e1:g2:h4:g6:h8");
    }

    #[test]
    fn along_first_rank() {
        let r = shortest_path_str("a1", "h1").unwrap();
        assert_eq!(r.distance, Some(5));
        assert_eq!(r.path_string(), "a1:c2:e1:d3:f2:h1");
    }

    #[test]
    fn tie_break_follows_offset_order() {
        let cases = [
            ("h8", "a1", "h8:f7:h6:f5:d4:b3:a1"),
            ("d4", "e5", "d4:f3:e5"),
            ("a1", "b2", "a1:c2:e1:d3:b2"),
            ("e4", "e5", "e4:g5:f7:e5"),
            ("g7", "h8", "g7:e8:d6:f7:h8"),
            ("a1", "d4", "a1:c2:d4"),
        ];
        for (from, to, expected) in cases {
            assert_eq!(shortest_path_str(from, to).unwrap().path_string(), expected, "{from}->{to}");
        }
    }

    #[test]
    fn invalid_squares_rejected() {
        for (a, b) in [("a1", "i9"), ("a0", "a1"), ("", "a1"), ("A1", "b3"), ("a1", "h9")] {
            assert!(shortest_path_str(a, b).is_err(), "{a:?} -> {b:?}");
        }
        let err = shortest_path_str("a1", "i9").unwrap_err();
        assert_eq!(err.input(), "i9");
    }

    #[test]
    fn every_pair_has_a_valid_shortest_path() {
        for s in Square::all() {
            let map = distance_map(s);
            for t in Square::all() {
                let r = shortest_path(s, t);
                let d = r.distance.expect("every square is reachable on 8x8");
                assert_eq!(r.path.len(), d as usize + 1);
                assert_eq!(r.path.first(), Some(&s));
                assert_eq!(r.path.last(), Some(&t));
                assert!(r.path.windows(2).all(|w| is_knight_move(w[0].point(), w[1].point())));
                assert_eq!(map.get(t), Some(d));
                assert_eq!(shortest_path(t, s).distance, Some(d));
            }
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let a = shortest_path(sq("b1"), sq("g8"));
        let b = shortest_path(sq("b1"), sq("g8"));
        assert_eq!(a, b);
    }

    #[test]
    fn unreachable_result_shape() {
        let r = KnightPath::unreachable();
        assert_eq!(r.distance, None);
        assert!(r.path.is_empty());
        assert_eq!(r.path_string(), "");
        assert_eq!(r.to_string(), "unreachable");
    }

    #[test]
    fn distance_map_from_corner() {
        let map = distance_map(sq("a1"));
        assert_eq!(map.source(), sq("a1"));
        assert_eq!(map.get(sq("a1")), Some(0));
        assert_eq!(map.get(sq("b2")), Some(4));
        assert_eq!(map.get(sq("h8")), Some(6));
        assert_eq!(map.max(), Some(6));
        let text = map.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8  5 4 5 4 5 4 5 6");
        assert_eq!(lines[7], "1  0 3 2 3 2 3 4 5");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn knight_path_json() {
        let r = shortest_path_str("a1", "b3").unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"distance":1,"path":["a1","b3"]}"#);
        let none = serde_json::to_string(&KnightPath::unreachable()).unwrap();
        assert_eq!(none, r#"{"distance":null,"path":[]}"#);
    }
}
