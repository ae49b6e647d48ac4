//! Holds Position struct, the most important data structure for the scoresheet.
//! Position represents a chess position.

use std::fmt::{self, Display};

use crate::bitboard::Bitboard;
use crate::boardrepr::PieceSets;
use crate::coretypes::{Castling, Color, Move, MoveCount, Piece, PieceKind, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::fen::Fen;
use crate::movegen::{self as mg, CastlingPath};
use crate::movelist::MoveList;

/// struct Position
/// A complete data set that can represent any chess position.
/// # Members:
/// * pieces - a piece-centric setwise container of all basic chess piece positions.
/// * side_to_move - Color of player whose turn it is.
/// * castling - Castling rights for both players.
/// * en_passant - Square skipped by the last double pawn push, if any.
/// * halfmoves - Tracker for 50 move draw rule. Resets after capture/pawn move.
/// * fullmoves - Starts at 1, increments after each black player's move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) pieces: PieceSets,
    pub(crate) side_to_move: Color,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmoves: MoveCount,
    pub(crate) fullmoves: MoveCount,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            pieces: PieceSets::start_position(),
            side_to_move: Color::White,
            castling: Castling::start_position(),
            en_passant: None,
            halfmoves: 0,
            fullmoves: 1,
        }
    }

    /// Const getters.
    pub fn pieces(&self) -> &PieceSets {
        &self.pieces
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn castling(&self) -> Castling {
        self.castling
    }
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }
    pub fn halfmoves(&self) -> MoveCount {
        self.halfmoves
    }
    pub fn fullmoves(&self) -> MoveCount {
        self.fullmoves
    }

    /// Returns the piece on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pieces.piece_at(square)
    }

    /// Square of `color`'s king.
    ///
    /// # Panics
    /// Every reachable position has exactly one king per color. A missing king is a
    /// broken invariant, not a recoverable error.
    pub fn king_square(&self, color: Color) -> Square {
        match self.pieces[(color, King)].get_lowest_square() {
            Some(square) => square,
            None => panic!("{color} has no king in position {}", self.to_fen()),
        }
    }

    /// Returns true if `square` is attacked by any piece of `by`.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        mg::is_attacked(&self.pieces, square, by)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        let color = self.side_to_move;
        self.is_attacked(self.king_square(color), !color)
    }

    /// Returns every pseudo-legal move for the side to move.
    /// Moves obey piece movement and occupancy but may leave the mover's king in check.
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        mg::pseudo_legal_moves(
            &mut moves,
            &self.pieces,
            self.side_to_move,
            self.castling,
            self.en_passant,
        );
        moves
    }

    /// Returns every legal move for the side to move.
    /// A pseudo-legal move is legal when, after playing it, the mover's king is not attacked.
    pub fn legal_moves(&self) -> MoveList {
        let color = self.side_to_move;
        let mut legal = MoveList::new();
        for move_ in self.pseudo_legal_moves() {
            let scratch = self.apply_move(move_);
            if !scratch.is_attacked(scratch.king_square(color), !color) {
                legal.push(move_);
            }
        }
        legal
    }

    /// Returns a new position with `move_` played. Self is unchanged.
    pub fn apply_move(&self, move_: Move) -> Position {
        let mut position = *self;
        position.do_move(move_);
        position
    }

    /// Apply a move to self, in place.
    /// `do_move` does not check if the move is legal,
    /// it executes it while assuming it came from this position's move generator.
    pub fn do_move(&mut self, move_: Move) {
        let color = self.side_to_move;
        debug_assert_eq!(move_.piece().color(), color);
        debug_assert_eq!(self.piece_at(move_.from()), Some(move_.piece()));

        if let Some(captured) = move_.captured() {
            self.pieces.remove(captured, move_.capture_square());
        }

        self.pieces.remove(move_.piece(), move_.from());
        let landing = match move_.promotion() {
            Some(promotion) => Piece::new(color, promotion),
            None => move_.piece(),
        };
        self.pieces.place(landing, move_.to());

        if let Some(side) = move_.castle() {
            let path = CastlingPath::of(color, side);
            let rook = Piece::new(color, Rook);
            self.pieces.remove(rook, path.rook_from);
            self.pieces.place(rook, path.rook_to);
        }

        self.update_castling(&move_);
        self.update_en_passant(&move_);
        self.update_move_counters(&move_);
        self.side_to_move = !color;
    }

    /// A king move forfeits both of its color's rights. Any move touching an initial
    /// rook square forfeits the right that rook carried, including capturing it.
    fn update_castling(&mut self, move_: &Move) {
        if move_.piece().piece_kind() == King {
            self.castling.clear_color(move_.piece().color());
        }
        self.castling.clear(Castling::lost_on(move_.from()));
        self.castling.clear(Castling::lost_on(move_.to()));
    }

    /// En Passant square is set to the skipped square after any double pawn push.
    /// Any other kind of move sets it to None.
    fn update_en_passant(&mut self, move_: &Move) {
        let from = Bitboard::from(move_.from());
        let color = move_.piece().color();
        self.en_passant = None;

        if move_.is_pawn_move() && mg::pawn_double_pushes(from, color).has_square(move_.to()) {
            self.en_passant = mg::pawn_single_pushes(from, color).get_lowest_square();
        }
    }

    /// halfmoves is set to zero after a capture or pawn move, incremented otherwise.
    /// fullmoves is incremented after each Black player's move.
    fn update_move_counters(&mut self, move_: &Move) {
        if move_.is_unrepeatable() {
            self.halfmoves = 0;
        } else {
            self.halfmoves = self.halfmoves.saturating_add(1);
        }

        if self.side_to_move == Black {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }
    }

    /// The side to move is in check and has no legal move.
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    /// The side to move is not in check and has no legal move.
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// Neither side can possibly checkmate.
    /// True when no pawns, rooks, or queens remain and the minor pieces are either
    /// at most one in total, or only bishops that all stand on squares of one color.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = Color::iter().fold(Bitboard::EMPTY, |acc, color| {
            acc | self.pieces[(color, Pawn)]
                | self.pieces[(color, Rook)]
                | self.pieces[(color, Queen)]
        });
        if !heavy.is_empty() {
            return false;
        }

        let (knights, bishops) = Color::iter().fold(
            (Bitboard::EMPTY, Bitboard::EMPTY),
            |(knights, bishops), color| {
                (
                    knights | self.pieces[(color, Knight)],
                    bishops | self.pieces[(color, Bishop)],
                )
            },
        );

        if knights.len() + bishops.len() <= 1 {
            return true;
        }
        knights.is_empty()
            && (Bitboard::DARK_SQUARES.contains(bishops)
                || Bitboard::LIGHT_SQUARES.contains(bishops))
    }

    /// At least 50 full moves without capture or pawn move, a draw either player may claim.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmoves >= 100
    }

    /// At least 75 full moves without capture or pawn move, an automatic draw.
    pub fn is_seventy_five_move_draw(&self) -> bool {
        self.halfmoves >= 150
    }

    /// Returns true if an en passant capture is available to the side to move.
    /// Used to decide whether the en passant square distinguishes repeated positions.
    pub fn has_legal_en_passant(&self) -> bool {
        self.en_passant.is_some() && self.legal_moves().iter().any(|m| m.is_en_passant())
    }

    /// Returns the number of pieces of a kind for both colors.
    pub fn count(&self, piece_kind: PieceKind) -> usize {
        Color::iter()
            .map(|color| self.pieces[(color, piece_kind)].len())
            .sum()
    }
}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Pretty board, followed by the FEN string.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pieces)?;
        write!(f, "{}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::{CastleSide, Square::*};

    fn find(position: &Position, from: Square, to: Square) -> Move {
        *position
            .legal_moves()
            .iter()
            .find(|m| {
                m.from() == from && m.to() == to && m.promotion().map_or(true, |p| p == Queen)
            })
            .expect("move is legal")
    }

    #[test]
    fn start_position_basics() {
        let pos = Position::start_position();
        assert_eq!(pos.legal_moves().len(), 20);
        assert!(!pos.is_check());
        assert!(!pos.is_checkmate());
        assert!(!pos.is_stalemate());
        assert_eq!(pos.king_square(White), E1);
        assert_eq!(pos.king_square(Black), E8);
        assert_eq!(pos.count(Pawn), 16);
    }

    #[test]
    fn apply_leaves_original_untouched() {
        let pos = Position::start_position();
        let after = pos.apply_move(find(&pos, E2, E4));
        assert_eq!(pos, Position::start_position());
        assert_eq!(after.side_to_move(), Black);
        assert_eq!(after.en_passant(), Some(E3));
        assert_eq!(after.halfmoves(), 0);
        assert_eq!(after.fullmoves(), 1);
        assert_eq!(after.piece_at(E4), Some(Piece::new(White, Pawn)));
        assert_eq!(after.piece_at(E2), None);
    }

    #[test]
    fn counters() {
        let mut pos = Position::start_position();
        pos.do_move(find(&pos, G1, F3));
        assert_eq!((pos.halfmoves(), pos.fullmoves()), (1, 1));
        pos.do_move(find(&pos, G8, F6));
        assert_eq!((pos.halfmoves(), pos.fullmoves()), (2, 2));
        pos.do_move(find(&pos, E2, E4));
        assert_eq!((pos.halfmoves(), pos.fullmoves()), (0, 2));
        assert_eq!(pos.en_passant(), Some(E3));
        pos.do_move(find(&pos, F6, E4));
        assert_eq!((pos.halfmoves(), pos.fullmoves()), (0, 3));
        assert_eq!(pos.en_passant(), None);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let pos = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castle = *pos
            .legal_moves()
            .iter()
            .find(|m| m.castle() == Some(CastleSide::King))
            .unwrap();
        let after = pos.apply_move(castle);
        assert_eq!(after.piece_at(G1), Some(Piece::new(White, King)));
        assert_eq!(after.piece_at(F1), Some(Piece::new(White, Rook)));
        assert_eq!(after.piece_at(H1), None);
        assert_eq!(after.castling(), Castling::B_SIDE);
    }

    #[test]
    fn rook_capture_clears_rights() {
        let pos = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let after = pos.apply_move(find(&pos, A1, A8));
        assert_eq!(after.castling(), Castling::W_KING | Castling::B_KING);
    }

    #[test]
    fn en_passant_removes_captured_pawn() {
        let pos = Position::parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let ep = find(&pos, E5, D6);
        assert!(ep.is_en_passant());
        let after = pos.apply_move(ep);
        assert_eq!(after.piece_at(D5), None);
        assert_eq!(after.piece_at(D6), Some(Piece::new(White, Pawn)));
        assert!(pos.has_legal_en_passant());
    }

    #[test]
    fn pinned_en_passant_is_not_legal() {
        // Capturing en passant would expose the white king on the fifth rank.
        let pos = Position::parse_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        assert!(!pos.has_legal_en_passant());
        assert!(pos.legal_moves().iter().all(|m| !m.is_en_passant()));
    }

    #[test]
    fn promotion_replaces_pawn() {
        let pos = Position::parse_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let promos: Vec<_> = pos
            .legal_moves()
            .iter()
            .filter(|m| m.promotion().is_some())
            .copied()
            .collect();
        assert_eq!(promos.len(), 4);
        let after = pos.apply_move(find(&pos, E7, E8));
        assert_eq!(after.piece_at(E8), Some(Piece::new(White, Queen)));
        assert_eq!(after.count(Pawn), 0);
    }

    #[test]
    fn checkmate_and_stalemate() {
        let fools_mate = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        let fools_mate = Position::parse_fen(fools_mate).unwrap();
        assert!(fools_mate.is_check());
        assert!(fools_mate.is_checkmate());
        assert!(!fools_mate.is_stalemate());

        let stalemate = Position::parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemate.is_stalemate());
        assert!(!stalemate.is_checkmate());
    }

    #[test]
    fn insufficient_material() {
        let cases = [
            ("8/8/4k3/8/8/4K3/8/8 w - - 0 1", true),
            ("8/8/4k3/8/8/4K3/5N2/8 w - - 0 1", true),
            ("8/8/4k3/8/8/4K3/5B2/8 w - - 0 1", true),
            // Bishops on c1 and f8 are both dark squares.
            ("5b2/8/4k3/8/8/4K3/8/2B5 w - - 0 1", true),
            ("2b5/8/4k3/8/8/4K3/8/2B5 w - - 0 1", false),
            ("8/8/4k3/8/8/4K3/5NN1/8 w - - 0 1", false),
            ("8/8/4k3/8/8/4K3/5NB1/8 w - - 0 1", false),
            ("8/8/4k3/8/8/4K3/4P3/8 w - - 0 1", false),
            ("8/8/4k3/8/8/4K3/4R3/8 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let pos = Position::parse_fen(fen).unwrap();
            assert_eq!(pos.is_insufficient_material(), expected, "{fen}");
        }
    }

    #[test]
    fn move_rule_thresholds() {
        let pos = Position::parse_fen("8/8/4k3/8/8/4K3/4R3/8 w - - 99 80").unwrap();
        assert!(!pos.is_fifty_move_draw());
        let pos = Position::parse_fen("8/8/4k3/8/8/4K3/4R3/8 w - - 100 80").unwrap();
        assert!(pos.is_fifty_move_draw());
        assert!(!pos.is_seventy_five_move_draw());
        let pos = Position::parse_fen("8/8/4k3/8/8/4K3/4R3/8 w - - 150 100").unwrap();
        assert!(pos.is_seventy_five_move_draw());
    }
}
