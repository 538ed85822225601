//! [`Square`]: one cell of the board and its two-character text form.

use std::fmt;
use std::str::FromStr;

use crate::board::{BOARD, on_board};
use crate::geom::Point;

/// A square on the 8×8 board.
///
/// Both coordinates are always in `0..8`; the only ways to obtain a
/// `Square` are the checked constructors and [`FromStr`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Create a square from a zero-based file (0 = 'a') and rank (0 = '1').
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if on_board(Point::new(file as i32, rank as i32)) {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    /// Convert a board point into a square, if it lies on the board.
    #[inline]
    pub const fn from_point(p: Point) -> Option<Self> {
        if on_board(p) {
            Some(Self {
                rank: p.y as u8,
                file: p.x as u8,
            })
        } else {
            None
        }
    }

    /// Zero-based file (0 = 'a').
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank (0 = '1').
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// The square as a board point.
    #[inline]
    pub const fn point(self) -> Point {
        Point::new(self.file as i32, self.rank as i32)
    }

    /// Letter of the file, `'a'..='h'`.
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// Digit of the rank, `'1'..='8'`.
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// All 64 squares, a1, b1, ..., h8.
    pub fn all() -> impl Iterator<Item = Square> {
        BOARD.iter().filter_map(Square::from_point)
    }

    /// Parse user-supplied text, tolerating surrounding whitespace and
    /// upper-case files.
    ///
    /// Request intake normalises with this before anything reaches the
    /// solver; [`FromStr`] itself is strict.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidSquare> {
        s.trim().to_ascii_lowercase().parse().map_err(|_| InvalidSquare {
            input: s.to_string(),
        })
    }
}

impl FromStr for Square {
    type Err = InvalidSquare;

    /// Accepts exactly a lowercase file letter followed by a rank digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidSquare {
            input: s.to_string(),
        };
        let &[f, r] = s.as_bytes() else {
            return Err(err());
        };
        if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
            return Err(err());
        }
        Square::new(f - b'a', r - b'1').ok_or_else(err)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Square {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Square {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Text that does not name a square: anything other than a letter `a-h`
/// followed by a digit `1-8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSquare {
    input: String,
}

impl InvalidSquare {
    /// The rejected text, verbatim.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for InvalidSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid square \u{201c}{}\u{201d}: must be between a1 and h8 inclusive",
            self.input
        )
    }
}

impl std::error::Error for InvalidSquare {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn parse_corners() {
        assert_eq!(sq("a1").point(), Point::new(0, 0));
        assert_eq!(sq("h1").point(), Point::new(7, 0));
        assert_eq!(sq("a8").point(), Point::new(0, 7));
        assert_eq!(sq("h8").point(), Point::new(7, 7));
    }

    #[test]
    fn display_matches_input() {
        for s in ["a1", "b3", "d4", "h8", "e5"] {
            assert_eq!(sq(s).to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["", "a", "a0", "a9", "i1", "i9", "A1", "a1 ", " a1", "a10", "1a", "é1"] {
            let err = bad.parse::<Square>().unwrap_err();
            assert_eq!(err.input(), bad);
        }
    }

    #[test]
    fn normalized_parse_folds_case_and_whitespace() {
        assert_eq!(Square::parse_normalized(" A1 ").unwrap(), sq("a1"));
        assert_eq!(Square::parse_normalized("H8").unwrap(), sq("h8"));
        assert!(Square::parse_normalized("I9").is_err());
        assert_eq!(Square::parse_normalized(" x ").unwrap_err().input(), " x ");
    }

    #[test]
    fn checked_constructors() {
        assert_eq!(Square::new(3, 4), Some(sq("d5")));
        assert_eq!(Square::new(8, 0), None);
        assert_eq!(Square::from_point(Point::new(-1, 3)), None);
        assert_eq!(Square::from_point(Point::new(2, 1)), Some(sq("c2")));
    }

    #[test]
    fn all_squares_in_order() {
        let all: Vec<Square> = Square::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0], sq("a1"));
        assert_eq!(all[1], sq("b1"));
        assert_eq!(all[63], sq("h8"));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }
}
