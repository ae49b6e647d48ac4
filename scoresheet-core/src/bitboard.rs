//! A compact set of chessboard squares,
//! where each bit index of a 64-bit unsigned integer represents one square.
//!
//! Data Order:
//! * Little-Endian Rank-File mapping (LSR)
//! * A1 = least significant bit = 0b0 = 0
//! * B1 = 0b1 = 1
//! * A2 = 0b1000 = 8
//! * H8 = most significant bit = 0x8000000000000000
//!
//! Compass Rose Bit Shifting:
//! ```text
//! NoWe       North       NoEa
//!      +7     +8      +9
//! West -1      0      +1 East
//!      -9     -8      -7
//! SoWe       South       SoEa
//! ```

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::coretypes::{File, Rank, Square, Square::*, SquareIndexable, NUM_FILES};

/// Alias for inner type of Bitboard. Useful for const evaluation.
pub type BitboardKind = u64;

/// Bitboard wraps a u64 where each set bit marks membership of its square.
/// Occupancy of each piece, attack patterns, and castling paths are all Bitboards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) BitboardKind);

// Bit-or the shifted value of every square identifier passed.
// Needed because `From` is not const.
// example: bb_from_shifts!(A1, A2) ->
//          Bitboard(0u64 | (1u64 << A1 as u8) | (1u64 << A2 as u8))
macro_rules! bb_from_shifts {
    ($($shiftable:ident),+) => {
        Bitboard(0u64 $( | (1u64 << $shiftable as u8))*)
    };
}
pub(crate) use bb_from_shifts;

/// Bitboard Constants
impl Bitboard {
    pub const EMPTY: Bitboard = Self(0x0);
    pub const FULL: Bitboard = Self(!0x0);
    pub const DARK_SQUARES: Bitboard = Self(0xAA55AA55AA55AA55);
    pub const LIGHT_SQUARES: Bitboard = Self(!Self::DARK_SQUARES.0);

    pub const RANK_1: Bitboard = bb_from_shifts!(A1, B1, C1, D1, E1, F1, G1, H1);
    pub const RANK_2: Bitboard = Self(Self::RANK_1.0 << 8);
    pub const RANK_4: Bitboard = Self(Self::RANK_1.0 << 24);
    pub const RANK_5: Bitboard = Self(Self::RANK_1.0 << 32);
    pub const RANK_7: Bitboard = Self(Self::RANK_1.0 << 48);
    pub const RANK_8: Bitboard = Self(Self::RANK_1.0 << 56);
    pub const BACK_RANKS: Bitboard = Self(Self::RANK_1.0 | Self::RANK_8.0);

    pub const FILE_A: Bitboard = bb_from_shifts!(A1, A2, A3, A4, A5, A6, A7, A8);
    pub const FILE_H: Bitboard = Self(Self::FILE_A.0 << 7);
}

impl Bitboard {
    /// Bitboard containing only `square`, usable in const contexts.
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1u64 << square as u8)
    }

    /// Returns true if there are no squares in self, false otherwise.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns number of squares in bitboard, 0 <= len <= 64.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if index is populated.
    #[inline(always)]
    pub fn has_square<I: SquareIndexable>(&self, idx: I) -> bool {
        self.0 & idx.shift() != 0
    }
    /// Sets bit index to 1.
    #[inline(always)]
    pub fn set_square<I: SquareIndexable>(&mut self, idx: I) {
        self.0 |= idx.shift();
    }
    /// Sets bit index to 0.
    #[inline(always)]
    pub fn clear_square<I: SquareIndexable>(&mut self, idx: I) {
        self.0 &= !idx.shift();
    }

    /// Clears the lowest square from self. If there are no squares, does nothing.
    #[inline(always)]
    pub fn clear_lowest_square(&mut self) {
        self.0 &= self.0.wrapping_sub(1);
    }

    /// Returns the lowest square that exists in bitboard, or None if bitboard has no squares.
    #[inline(always)]
    pub fn get_lowest_square(&self) -> Option<Square> {
        Square::from_u8(self.0.trailing_zeros() as u8)
    }

    /// Returns true if other is a subset of self.
    #[inline(always)]
    pub const fn contains(&self, other: Bitboard) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if self and other share any square.
    #[inline(always)]
    pub const fn has_any(&self, other: Bitboard) -> bool {
        self.0 & other.0 != Self::EMPTY.0
    }

    /// Shifted one square north (ex: D4 -> D5).
    #[inline(always)]
    pub const fn to_north(&self) -> Self {
        Self(self.0 << 8)
    }
    /// Shifted one square south (ex: D4 -> D3).
    #[inline(always)]
    pub const fn to_south(&self) -> Self {
        Self(self.0 >> 8)
    }
    /// Shifted one square east (ex: D4 -> E4). Bits wrapping onto FILE_A are removed.
    #[inline(always)]
    pub const fn to_east(&self) -> Self {
        Self((self.0 << 1) & !Self::FILE_A.0)
    }
    /// Shifted one square west (ex: D4 -> C4). Bits wrapping onto FILE_H are removed.
    #[inline(always)]
    pub const fn to_west(&self) -> Self {
        Self((self.0 >> 1) & !Self::FILE_H.0)
    }
    #[inline(always)]
    pub const fn to_north_east(&self) -> Self {
        Self((self.0 << 9) & !Self::FILE_A.0)
    }
    #[inline(always)]
    pub const fn to_north_west(&self) -> Self {
        Self((self.0 << 7) & !Self::FILE_H.0)
    }
    #[inline(always)]
    pub const fn to_south_east(&self) -> Self {
        Self((self.0 >> 7) & !Self::FILE_A.0)
    }
    #[inline(always)]
    pub const fn to_south_west(&self) -> Self {
        Self((self.0 >> 9) & !Self::FILE_H.0)
    }
}

impl Not for Bitboard {
    type Output = Self;
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl<I: SquareIndexable> From<I> for Bitboard {
    fn from(square_index: I) -> Self {
        Self(square_index.shift())
    }
}

impl From<File> for Bitboard {
    fn from(file: File) -> Self {
        Self(Self::FILE_A.0 << file as u8)
    }
}

impl From<Rank> for Bitboard {
    fn from(rank: Rank) -> Self {
        Self(Self::RANK_1.0 << (NUM_FILES as u8 * rank as u8))
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut bb = Bitboard::EMPTY;
        iter.into_iter().for_each(|square| bb.set_square(square));
        bb
    }
}

/// Iterator type that yields each square in a bitboard, lowest first.
pub struct BitboardSquareIterator {
    bb: Bitboard,
}

impl Iterator for BitboardSquareIterator {
    type Item = Square;
    fn next(&mut self) -> Option<Self::Item> {
        let maybe_square = self.bb.get_lowest_square();
        self.bb.clear_lowest_square();
        maybe_square
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bb.len();
        (size, Some(size))
    }
}
impl ExactSizeIterator for BitboardSquareIterator {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardSquareIterator;
    fn into_iter(self) -> Self::IntoIter {
        BitboardSquareIterator { bb: self }
    }
}

/// Board diagram with rank 8 on top, '1' for members and '.' otherwise.
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let square = Square::from_u8(rank * 8 + file).ok_or(fmt::Error)?;
                f.write_str(if self.has_square(square) { "1" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
