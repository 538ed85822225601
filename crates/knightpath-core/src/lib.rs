//! **knightpath-core** — board geometry and square types for the knight
//! shortest-path solver.
//!
//! This crate provides the foundational types used across the *knightpath*
//! workspace: integer geometry primitives, the fixed 8×8 board with its
//! knight move table, and the [`Square`] value type with its textual form.

pub mod board;
pub mod geom;
pub mod square;

pub use board::{BOARD, BOARD_SIZE, KNIGHT_OFFSETS, is_knight_move, on_board};
pub use geom::{Point, Range};
pub use square::{InvalidSquare, Square};
