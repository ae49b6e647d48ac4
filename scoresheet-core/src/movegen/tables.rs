//! Lookup tables of how leaping pieces move on an otherwise empty board.

use crate::bitboard::Bitboard;
use crate::coretypes::{SquareIndexable, NUM_SQUARES};

// Arrays are indexed by Square's discriminant. Attacks == pseudo-legal moves.
pub const KNIGHT_PATTERN: [Bitboard; NUM_SQUARES] = generate_knight_patterns();
pub const KING_PATTERN: [Bitboard; NUM_SQUARES] = generate_king_patterns();

/// Convenience function for pre-generated lookup array.
#[inline(always)]
pub fn knight_pattern<I: SquareIndexable>(idx: I) -> Bitboard {
    KNIGHT_PATTERN[idx.idx()]
}
/// Convenience function for pre-generated lookup array.
#[inline(always)]
pub fn king_pattern<I: SquareIndexable>(idx: I) -> Bitboard {
    KING_PATTERN[idx.idx()]
}

// Function pointers cannot be called in const fn, so each table has its own loop.
const fn generate_knight_patterns() -> [Bitboard; NUM_SQUARES] {
    let mut pattern_arr = [Bitboard::EMPTY; NUM_SQUARES];
    let mut index = 0;
    while index < NUM_SQUARES {
        pattern_arr[index] = knight_pattern_from(Bitboard(1u64 << index));
        index += 1;
    }
    pattern_arr
}

const fn generate_king_patterns() -> [Bitboard; NUM_SQUARES] {
    let mut pattern_arr = [Bitboard::EMPTY; NUM_SQUARES];
    let mut index = 0;
    while index < NUM_SQUARES {
        pattern_arr[index] = king_pattern_from(Bitboard(1u64 << index));
        index += 1;
    }
    pattern_arr
}

/// Knights move in an L shape: two squares one way and one square perpendicular.
const fn knight_pattern_from(origin: Bitboard) -> Bitboard {
    let north = origin.to_north().to_north();
    let south = origin.to_south().to_south();
    let east = origin.to_east().to_east();
    let west = origin.to_west().to_west();

    Bitboard(
        north.to_east().0
            | north.to_west().0
            | south.to_east().0
            | south.to_west().0
            | east.to_north().0
            | east.to_south().0
            | west.to_north().0
            | west.to_south().0,
    )
}

/// Kings move one square in any direction.
const fn king_pattern_from(origin: Bitboard) -> Bitboard {
    Bitboard(
        origin.to_north().0
            | origin.to_south().0
            | origin.to_east().0
            | origin.to_west().0
            | origin.to_north_east().0
            | origin.to_north_west().0
            | origin.to_south_east().0
            | origin.to_south_west().0,
    )
}
