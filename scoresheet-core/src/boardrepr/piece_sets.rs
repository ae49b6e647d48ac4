//! Piece-Centric representation of a chess board.

use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use crate::bitboard::Bitboard;
use crate::boardrepr::Mailbox;
use crate::coretypes::{Color, Piece, PieceKind, Square, NUM_PIECE_KINDS};

/// A Piece-Centric representation of pieces on a chessboard.
/// A Bitboard is used to encode the squares of each chess piece.
/// PieceSets indexes by piece to get squares, as opposed to Mailbox which
/// indexes by square to get a piece.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PieceSets {
    pieces: [Bitboard; NUM_PIECE_KINDS],
}

impl PieceSets {
    /// Returns PieceSets with all Bitboards set to empty.
    pub const fn new() -> Self {
        PieceSets {
            pieces: [Bitboard::EMPTY; NUM_PIECE_KINDS],
        }
    }

    /// Returns PieceSets arranged in starting chess position.
    pub fn start_position() -> Self {
        Self::from(&Mailbox::start_position())
    }

    /// Set of squares occupied by any piece.
    pub fn occupied(&self) -> Bitboard {
        self.pieces.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// Set of squares occupied by pieces of `color`.
    pub fn color_occupied(&self, color: Color) -> Bitboard {
        PieceKind::iter().fold(Bitboard::EMPTY, |acc, piece_kind| {
            acc | self[(color, piece_kind)]
        })
    }

    /// Returns the piece on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        Color::iter()
            .flat_map(|color| PieceKind::iter().map(move |kind| Piece::new(color, kind)))
            .find(|piece| self[piece].has_square(square))
    }

    /// Places `piece` on `square`. The square must be empty.
    pub fn place(&mut self, piece: Piece, square: Square) {
        debug_assert!(self.piece_at(square).is_none());
        self[&piece].set_square(square);
    }

    /// Removes `piece` from `square`.
    pub fn remove(&mut self, piece: Piece, square: Square) {
        debug_assert!(self[&piece].has_square(square));
        self[&piece].clear_square(square);
    }

    /// Returns pretty-printed chess board representation of Self.
    pub fn pretty(&self) -> String {
        Mailbox::from(self).pretty()
    }
}

impl Index<&Piece> for PieceSets {
    type Output = Bitboard;
    fn index(&self, piece: &Piece) -> &Self::Output {
        &self.pieces[piece.index()]
    }
}

impl IndexMut<&Piece> for PieceSets {
    fn index_mut(&mut self, piece: &Piece) -> &mut Self::Output {
        &mut self.pieces[piece.index()]
    }
}

impl Index<(Color, PieceKind)> for PieceSets {
    type Output = Bitboard;
    fn index(&self, (color, piece_kind): (Color, PieceKind)) -> &Self::Output {
        &self[&Piece::new(color, piece_kind)]
    }
}

impl From<&Mailbox> for PieceSets {
    fn from(mb: &Mailbox) -> Self {
        let mut pieces = Self::new();

        for square in Square::iter() {
            if let Some(ref piece) = mb[square] {
                pieces[piece].set_square(square);
            }
        }
        pieces
    }
}

/// Defaults to standard chess piece starting positions.
impl Default for PieceSets {
    fn default() -> Self {
        Self::start_position()
    }
}

impl Display for PieceSets {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Square::*;

    #[test]
    fn piece_indexing() {
        let pieces = PieceSets::start_position();
        let w_king = &pieces[&Piece::new(Color::White, PieceKind::King)];
        assert_eq!(w_king.len(), 1);
        assert!(w_king.has_square(E1));
        let b_pawns = pieces[(Color::Black, PieceKind::Pawn)];
        assert_eq!(b_pawns, Bitboard::RANK_7);
    }

    #[test]
    fn color_occupancy() {
        let pieces = PieceSets::start_position();
        let w_occupancy = pieces.color_occupied(Color::White);
        assert_eq!(w_occupancy, Bitboard::RANK_1 | Bitboard::RANK_2);
        let b_occupancy = pieces.color_occupied(Color::Black);
        assert_eq!(b_occupancy, Bitboard::RANK_7 | Bitboard::RANK_8);
        assert_eq!(pieces.occupied().len(), 32);
    }

    #[test]
    fn place_remove_and_lookup() {
        let mut pieces = PieceSets::new();
        let knight = Piece::new(Color::Black, PieceKind::Knight);
        assert_eq!(pieces.piece_at(F6), None);
        pieces.place(knight, F6);
        assert_eq!(pieces.piece_at(F6), Some(knight));
        pieces.remove(knight, F6);
        assert!(pieces.occupied().is_empty());
    }
}
