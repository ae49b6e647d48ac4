//! Pseudo-legal move generation and attack detection.
//!
//! Every generator here considers occupancy but not check. Positions filter
//! the pseudo-legal list into legal moves by playing each move on a scratch
//! copy and asking whether the mover's king is attacked afterwards.

use crate::bitboard::Bitboard;
use crate::boardrepr::PieceSets;
use crate::coretypes::{
    CastleSide, Castling, Color, Color::*, Move, Piece, PieceKind, PieceKind::*, Square, Square::*,
};
use crate::movelist::MoveList;

pub mod rays;
pub mod tables;

/// Generate every pseudo-legal move for `color` and append to move list.
pub fn pseudo_legal_moves(
    moves: &mut MoveList,
    pieces: &PieceSets,
    color: Color,
    castling: Castling,
    en_passant: Option<Square>,
) {
    pawn_pseudo_moves(moves, pieces, color, en_passant);
    knight_pseudo_moves(moves, pieces, color);
    slider_pseudo_moves(moves, pieces, color, Bishop);
    slider_pseudo_moves(moves, pieces, color, Rook);
    slider_pseudo_moves(moves, pieces, color, Queen);
    king_pseudo_moves(moves, pieces, color);
    castling_moves(moves, pieces, color, castling);
}

/// Generate all pseudo-legal pawn moves and append to move list.
/// Pushes reaching the last rank expand into one move per promotion piece,
/// and a diagonal step onto the en passant target becomes an en passant capture.
pub fn pawn_pseudo_moves(
    moves: &mut MoveList,
    pieces: &PieceSets,
    color: Color,
    en_passant: Option<Square>,
) {
    let occupied = pieces.occupied();
    let them = pieces.color_occupied(!color);
    let pawn_piece = Piece::new(color, Pawn);
    let last_rank = match color {
        White => Bitboard::RANK_8,
        Black => Bitboard::RANK_1,
    };

    for from in pieces[&pawn_piece] {
        let pawn = Bitboard::from(from);
        let single_push = pawn_single_pushes(pawn, color) & !occupied;
        let double_push = pawn_double_pushes(pawn, color) & !occupied;
        let valid_double_push = double_push & pawn_single_pushes(single_push, color);
        let attacks = pawn_attacks(pawn, color);

        let quiet = (single_push | valid_double_push)
            .into_iter()
            .map(|to| Move::new(from, to, pawn_piece));
        let captures = (attacks & them)
            .into_iter()
            .map(|to| Move::new(from, to, pawn_piece).with_capture(pieces.piece_at(to)));

        for move_ in quiet.chain(captures) {
            if last_rank.has_square(move_.to()) {
                for promotion in PieceKind::PROMOTIONS {
                    moves.push(move_.with_promotion(promotion));
                }
            } else {
                moves.push(move_);
            }
        }

        if let Some(ep_square) = en_passant {
            if attacks.has_square(ep_square) && !occupied.has_square(ep_square) {
                moves.push(Move::en_passant(from, ep_square, color));
            }
        }
    }
}

/// Generate all pseudo-legal knight moves and append to move list.
pub fn knight_pseudo_moves(moves: &mut MoveList, pieces: &PieceSets, color: Color) {
    let us = pieces.color_occupied(color);
    let knight = Piece::new(color, Knight);
    for from in pieces[&knight] {
        push_targets(moves, pieces, from, knight, tables::knight_pattern(from) & !us);
    }
}

/// Generate all pseudo-legal king steps, not including castling, and append to move list.
pub fn king_pseudo_moves(moves: &mut MoveList, pieces: &PieceSets, color: Color) {
    let us = pieces.color_occupied(color);
    let king = Piece::new(color, King);
    for from in pieces[&king] {
        push_targets(moves, pieces, from, king, tables::king_pattern(from) & !us);
    }
}

/// Generate all pseudo-legal moves for bishops, rooks, or queens of a color.
pub fn slider_pseudo_moves(
    moves: &mut MoveList,
    pieces: &PieceSets,
    color: Color,
    piece_kind: PieceKind,
) {
    debug_assert!(piece_kind.is_sliding());
    let occupied = pieces.occupied();
    let us = pieces.color_occupied(color);
    let slider = Piece::new(color, piece_kind);
    let attacks_from = match piece_kind {
        Bishop => rays::bishop_attacks,
        Rook => rays::rook_attacks,
        _ => rays::queen_attacks,
    };

    for from in pieces[&slider] {
        push_targets(moves, pieces, from, slider, attacks_from(from, occupied) & !us);
    }
}

fn push_targets(
    moves: &mut MoveList,
    pieces: &PieceSets,
    from: Square,
    piece: Piece,
    tos: Bitboard,
) {
    for to in tos {
        moves.push(Move::new(from, to, piece).with_capture(pieces.piece_at(to)));
    }
}

/// Generate castling moves and append to move list.
/// Castling is allowed when the right is held, king and rook stand on their
/// initial squares, every square between them is empty, and the king does not
/// start on, pass through, or land on an attacked square.
pub fn castling_moves(moves: &mut MoveList, pieces: &PieceSets, color: Color, castling: Castling) {
    let occupied = pieces.occupied();
    let king = Piece::new(color, King);
    let rook = Piece::new(color, Rook);

    for side in [CastleSide::King, CastleSide::Queen] {
        if !castling.has(Castling::right(color, side)) {
            continue;
        }
        let path = CastlingPath::of(color, side);
        if !pieces[&king].has_square(path.king_from) || !pieces[&rook].has_square(path.rook_from) {
            continue;
        }
        if occupied.has_any(path.between) {
            continue;
        }
        if path.king_walk.into_iter().any(|square| is_attacked(pieces, square, !color)) {
            continue;
        }
        moves.push(Move::castling(color, side));
    }
}

/// Squares involved in one castling move.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CastlingPath {
    pub king_from: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty.
    pub between: Bitboard,
    /// Squares the king stands on, passes through and lands on. None may be attacked.
    pub king_walk: Bitboard,
}

impl CastlingPath {
    pub const fn of(color: Color, side: CastleSide) -> Self {
        use crate::bitboard::bb_from_shifts;
        match (color, side) {
            (White, CastleSide::King) => CastlingPath {
                king_from: E1,
                rook_from: H1,
                rook_to: F1,
                between: bb_from_shifts!(F1, G1),
                king_walk: bb_from_shifts!(E1, F1, G1),
            },
            (White, CastleSide::Queen) => CastlingPath {
                king_from: E1,
                rook_from: A1,
                rook_to: D1,
                between: bb_from_shifts!(B1, C1, D1),
                king_walk: bb_from_shifts!(E1, D1, C1),
            },
            (Black, CastleSide::King) => CastlingPath {
                king_from: E8,
                rook_from: H8,
                rook_to: F8,
                between: bb_from_shifts!(F8, G8),
                king_walk: bb_from_shifts!(E8, F8, G8),
            },
            (Black, CastleSide::Queen) => CastlingPath {
                king_from: E8,
                rook_from: A8,
                rook_to: D8,
                between: bb_from_shifts!(B8, C8, D8),
                king_walk: bb_from_shifts!(E8, D8, C8),
            },
        }
    }
}

/// Returns all squares reached by a single push of each pawn.
pub fn pawn_single_pushes(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        White => pawns.to_north(),
        Black => pawns.to_south(),
    }
}

/// Returns all squares reached by a double push of pawns on their starting rank.
pub fn pawn_double_pushes(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        White => (pawns & Bitboard::RANK_2).to_north().to_north(),
        Black => (pawns & Bitboard::RANK_7).to_south().to_south(),
    }
}

/// Returns all squares attacked by pawns of a color.
pub fn pawn_attacks(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        White => pawns.to_north_east() | pawns.to_north_west(),
        Black => pawns.to_south_east() | pawns.to_south_west(),
    }
}

/// Returns the pieces of color `by` that attack `target`.
pub fn attackers_to(pieces: &PieceSets, target: Square, by: Color) -> Bitboard {
    let occupied = pieces.occupied();
    let target_bb = Bitboard::from(target);
    let queens = pieces[(by, Queen)];

    // A pawn of `by` attacks target when a pawn of the other color on target would attack it back.
    let pawns = pawn_attacks(target_bb, !by) & pieces[(by, Pawn)];
    let knights = tables::knight_pattern(target) & pieces[(by, Knight)];
    let kings = tables::king_pattern(target) & pieces[(by, King)];
    let orthogonal = rays::rook_attacks(target, occupied) & (pieces[(by, Rook)] | queens);
    let diagonal = rays::bishop_attacks(target, occupied) & (pieces[(by, Bishop)] | queens);

    pawns | knights | kings | orthogonal | diagonal
}

/// Returns true if any piece of color `by` attacks `target`.
pub fn is_attacked(pieces: &PieceSets, target: Square, by: Color) -> bool {
    !attackers_to(pieces, target, by).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boardrepr::Mailbox;

    fn board(placements: &[(Square, Color, PieceKind)]) -> PieceSets {
        let mut mb = Mailbox::new();
        for &(square, color, piece_kind) in placements {
            mb[square] = Some(Piece::new(color, piece_kind));
        }
        PieceSets::from(&mb)
    }

    #[test]
    fn start_position_pseudo_moves() {
        let pieces = PieceSets::start_position();
        let mut moves = MoveList::new();
        pseudo_legal_moves(&mut moves, &pieces, White, Castling::ALL, None);
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|move_| !move_.is_capture()));
    }

    #[test]
    fn pawn_promotions_expand() {
        let pieces = board(&[
            (E1, White, King),
            (E8, Black, King),
            (B7, White, Pawn),
            (A8, Black, Rook),
        ]);
        let mut moves = MoveList::new();
        pawn_pseudo_moves(&mut moves, &pieces, White, None);
        // 4 pushes to b8, 4 captures on a8.
        assert_eq!(moves.len(), 8);
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 4);
        assert!(moves.iter().all(|m| m.promotion().is_some()));
    }

    #[test]
    fn pawn_en_passant() {
        let pieces = board(&[
            (E1, White, King),
            (E8, Black, King),
            (E5, White, Pawn),
            (D5, Black, Pawn),
        ]);
        let mut moves = MoveList::new();
        pawn_pseudo_moves(&mut moves, &pieces, White, Some(D6));
        let ep = moves.iter().find(|m| m.is_en_passant()).expect("en passant generated");
        assert_eq!(ep.to(), D6);
        assert_eq!(ep.capture_square(), D5);
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn blocked_double_push() {
        let pieces = board(&[
            (E1, White, King),
            (E8, Black, King),
            (C2, White, Pawn),
            (C3, Black, Knight),
        ]);
        let mut moves = MoveList::new();
        pawn_pseudo_moves(&mut moves, &pieces, White, None);
        assert!(moves.is_empty());
    }

    #[test]
    fn castling_requires_safe_path() {
        let mut pieces = board(&[
            (E1, White, King),
            (H1, White, Rook),
            (A1, White, Rook),
            (E8, Black, King),
        ]);
        let mut moves = MoveList::new();
        castling_moves(&mut moves, &pieces, White, Castling::W_SIDE);
        assert_eq!(moves.len(), 2);

        // Bishop on a6 covers f1.
        pieces.place(Piece::new(Black, Bishop), A6);
        let mut moves = MoveList::new();
        castling_moves(&mut moves, &pieces, White, Castling::W_SIDE);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].castle(), Some(CastleSide::Queen));

        // b1 may be attacked, but not empty.
        pieces.place(Piece::new(White, Knight), B1);
        let mut moves = MoveList::new();
        castling_moves(&mut moves, &pieces, White, Castling::W_SIDE);
        assert!(moves.is_empty());
    }

    #[test]
    fn castling_requires_rook() {
        let pieces = board(&[(E1, White, King), (E8, Black, King)]);
        let mut moves = MoveList::new();
        castling_moves(&mut moves, &pieces, White, Castling::ALL);
        assert!(moves.is_empty());
    }

    #[test]
    fn attackers() {
        let pieces = board(&[
            (E1, White, King),
            (E8, Black, King),
            (D4, Black, Pawn),
            (B3, White, Knight),
            (H4, White, Rook),
            (A7, White, Bishop),
        ]);
        // d4 pawn attacks c3 and e3, both toward white.
        assert!(is_attacked(&pieces, C3, Black));
        assert!(is_attacked(&pieces, E3, Black));
        assert!(!is_attacked(&pieces, D3, Black));
        let on_d4 = attackers_to(&pieces, D4, White);
        assert_eq!(on_d4, Bitboard::from(B3) | Bitboard::from(H4) | Bitboard::from(A7));
    }
}
