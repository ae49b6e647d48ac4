//! Attack rays for sliding pieces.

use crate::bitboard::Bitboard;
use crate::coretypes::Square;

type Direction = fn(&Bitboard) -> Bitboard;

const ORTHOGONALS: [Direction; 4] = [
    Bitboard::to_north,
    Bitboard::to_south,
    Bitboard::to_east,
    Bitboard::to_west,
];
const DIAGONALS: [Direction; 4] = [
    Bitboard::to_north_east,
    Bitboard::to_north_west,
    Bitboard::to_south_east,
    Bitboard::to_south_west,
];

/// Generate a ray from the origin exclusive to the first occupied square inclusive,
/// stepping with one of the Bitboard compass shifts.
#[inline(always)]
fn ray_scan(origin: Square, occupancy: Bitboard, direction: Direction) -> Bitboard {
    let mut ray = Bitboard::EMPTY;
    let mut cursor = direction(&Bitboard::from(origin));
    while !cursor.is_empty() {
        ray |= cursor;
        if occupancy.has_any(cursor) {
            break;
        }
        cursor = direction(&cursor);
    }
    ray
}

/// Squares a rook on `origin` attacks given board `occupancy`.
pub(crate) fn rook_attacks(origin: Square, occupancy: Bitboard) -> Bitboard {
    ORTHOGONALS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_scan(origin, occupancy, dir))
}

/// Squares a bishop on `origin` attacks given board `occupancy`.
pub(crate) fn bishop_attacks(origin: Square, occupancy: Bitboard) -> Bitboard {
    DIAGONALS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_scan(origin, occupancy, dir))
}

pub(crate) fn queen_attacks(origin: Square, occupancy: Bitboard) -> Bitboard {
    rook_attacks(origin, occupancy) | bishop_attacks(origin, occupancy)
}
