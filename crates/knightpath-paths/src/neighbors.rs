use knightpath_core::{KNIGHT_OFFSETS, Point};

/// Knight targets from `p` in [`KNIGHT_OFFSETS`] order, keeping only those
/// for which `keep` returns `true`.
///
/// Targets are not bounds-checked; pass [`knightpath_core::on_board`] (or a
/// stricter predicate) as `keep`.
pub fn knight_neighbors(p: Point, keep: impl Fn(Point) -> bool) -> impl Iterator<Item = Point> {
    KNIGHT_OFFSETS
        .into_iter()
        .map(move |d| p + d)
        .filter(move |&n| keep(n))
}
