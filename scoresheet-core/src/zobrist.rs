//! Zobrist Hashing of positions, used as the identity of a position when
//! counting repetitions.

use std::collections::HashSet;
use std::ops::Index;

use rand::prelude::*;

use crate::coretypes::{Castling, Color, File, Piece, PieceKind, Square, SquareIndexable};
use crate::coretypes::{NUM_FILES, NUM_PIECE_KINDS, NUM_SQUARES};
use crate::position::Position;

/// HashKind is an alias for the underlying type of a Zobrist Hash.
pub type HashKind = u64;

/// ZobristTable contains unique, pseudo-randomly generated values
/// used for calculating the Zobrist Hash of a chess position.
///
/// Each Piece gets a unique number for each square.
/// A single side to move gets a unique number.
/// Each possible combination of castling rights gets a unique number.
/// Each possible file for En-Passant gets a unique number.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ZobristTable {
    piece_hash: [[HashKind; NUM_SQUARES]; NUM_PIECE_KINDS],
    ep_hash: [HashKind; NUM_FILES],
    castling_hash: [HashKind; Castling::ENUMERATIONS],
    player_hash: HashKind,
}

impl ZobristTable {
    const TOGGLE_PLAYER: Color = Color::Black;

    /// Returns a new ZobristTable with randomly seeded, unique values.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Returns a new ZobristTable with unique values generated from seeded rng.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        // Each value used must be unique.
        let mut used_values = HashSet::new();
        let mut unique_value = move || loop {
            let value: HashKind = rng.gen();
            if used_values.insert(value) {
                break value;
            }
        };

        let mut piece_hash = [[HashKind::default(); NUM_SQUARES]; NUM_PIECE_KINDS];
        let mut ep_hash = [HashKind::default(); NUM_FILES];
        let mut castling_hash = [HashKind::default(); Castling::ENUMERATIONS];

        for item in piece_hash
            .iter_mut()
            .flatten()
            .chain(ep_hash.iter_mut())
            .chain(castling_hash.iter_mut())
        {
            *item = unique_value();
        }
        let player_hash = unique_value();

        Self {
            piece_hash,
            ep_hash,
            castling_hash,
            player_hash,
        }
    }

    /// Generate the hash of a position in context of this ZobristTable.
    ///
    /// Two positions hash equal when they have the same placement, side to move,
    /// castling rights, and en passant possibilities. The en passant file is only
    /// hashed when an en passant capture is actually legal, so a double push that
    /// gives no capture opportunity repeats the position reached by any other move order.
    pub fn generate_hash(&self, position: &Position) -> HashKind {
        let mut hash = HashKind::default();

        for color in Color::iter() {
            for piece_kind in PieceKind::iter() {
                let piece = Piece::new(color, piece_kind);
                for square in position.pieces()[&piece] {
                    hash ^= self[(piece, square)];
                }
            }
        }

        if let Some(ep_square) = position.en_passant() {
            if position.has_legal_en_passant() {
                hash ^= self[ep_square.file()];
            }
        }

        hash ^= self[position.castling()];

        if position.side_to_move() == Self::TOGGLE_PLAYER {
            hash ^= self.player_hash;
        }

        hash
    }
}

/// Default for ZobristTable is a table with a random seed.
impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Index used for accessing piece_hash.
impl Index<(Piece, Square)> for ZobristTable {
    type Output = HashKind;
    fn index(&self, (piece, square): (Piece, Square)) -> &Self::Output {
        &self.piece_hash[piece.index()][square.idx()]
    }
}

/// Index used for accessing ep_hash (en-passant hash).
impl Index<File> for ZobristTable {
    type Output = HashKind;
    fn index(&self, index: File) -> &Self::Output {
        &self.ep_hash[index as usize]
    }
}

/// Index used for accessing castling_hash.
impl Index<Castling> for ZobristTable {
    type Output = HashKind;
    fn index(&self, index: Castling) -> &Self::Output {
        &self.castling_hash[index.bits() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    fn hash_fen(table: &ZobristTable, fen: &str) -> HashKind {
        table.generate_hash(&Position::parse_fen(fen).unwrap())
    }

    #[test]
    fn seeded_tables_agree() {
        let a = ZobristTable::with_seed(7);
        let b = ZobristTable::with_seed(7);
        assert_eq!(a, b);
        let start = Position::start_position();
        assert_eq!(a.generate_hash(&start), b.generate_hash(&start));
    }

    #[test]
    fn counters_do_not_affect_hash() {
        let table = ZobristTable::with_seed(1);
        assert_eq!(
            hash_fen(&table, "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1"),
            hash_fen(&table, "4k3/8/8/8/8/8/8/R3K3 w Q - 37 60"),
        );
    }

    #[test]
    fn hash_distinguishes_state() {
        let table = ZobristTable::with_seed(2);
        let base = hash_fen(&table, "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_ne!(base, hash_fen(&table, "4k3/8/8/8/8/8/8/R3K3 b Q - 0 1"));
        assert_ne!(base, hash_fen(&table, "4k3/8/8/8/8/8/8/R3K3 w - - 0 1"));
        assert_ne!(base, hash_fen(&table, "4k3/8/8/8/8/8/8/1R2K3 w - - 0 1"));
    }

    #[test]
    fn en_passant_only_counts_when_capturable() {
        let table = ZobristTable::with_seed(3);
        // No black pawn can take on e3.
        assert_eq!(
            hash_fen(&table, "4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1"),
            hash_fen(&table, "4k3/8/8/8/4P3/8/8/4K3 b - - 0 1"),
        );
        // Black pawn on d4 can.
        assert_ne!(
            hash_fen(&table, "4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1"),
            hash_fen(&table, "4k3/8/8/8/3pP3/8/8/4K3 b - - 0 1"),
        );
    }
}
