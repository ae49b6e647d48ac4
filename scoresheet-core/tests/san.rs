//! Standard Algebraic Notation
//!
//! Encoding then parsing returns the same move for every legal move of many positions,
//! and a complete game written in SAN reads back exactly as it was written.

use scoresheet_core::fen::Fen;
use scoresheet_core::san::{self, NotationError};
use scoresheet_core::*;

const FENS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    // Three queens can reach d4 from a file, a rank, and a diagonal.
    "6k1/8/8/8/Q6Q/8/8/Q3K3 w - - 0 1",
];

/// Every legal move of `position` survives an encode and parse.
fn assert_round_trip(position: &Position) {
    for legal_move in position.legal_moves() {
        let encoded = san::encode(legal_move, position);
        assert_eq!(
            san::parse(&encoded, position),
            Ok(legal_move),
            "{encoded} in {}",
            position.to_fen()
        );
    }
}

#[test]
fn round_trip_two_plies_deep() {
    for fen in FENS {
        let root = Position::parse_fen(fen).unwrap();
        assert_round_trip(&root);
        for first in root.legal_moves() {
            let child = root.apply_move(first);
            assert_round_trip(&child);
        }
    }
}

#[test]
fn encoded_moves_are_unique() {
    for fen in FENS {
        let position = Position::parse_fen(fen).unwrap();
        let mut encoded: Vec<String> = position
            .legal_moves()
            .into_iter()
            .map(|legal_move| san::encode(legal_move, &position))
            .collect();
        let count = encoded.len();
        encoded.sort();
        encoded.dedup();
        assert_eq!(encoded.len(), count, "{fen}");
    }
}

#[test]
fn queens_need_full_disambiguation() {
    let position = Position::parse_fen("6k1/8/8/8/Q6Q/8/8/Q3K3 w - - 0 1").unwrap();
    assert_eq!(san::parse("Qd4", &position), Err(NotationError::AmbiguousMove));
    assert_eq!(san::parse("Qad4", &position), Err(NotationError::AmbiguousMove));
    assert_eq!(san::parse("Q4d4", &position), Err(NotationError::AmbiguousMove));
    let move_ = san::parse("Qa4d4", &position).unwrap();
    assert_eq!(san::encode(move_, &position), "Qa4d4");
    let move_ = san::parse("Qhd4", &position).unwrap();
    assert_eq!(san::encode(move_, &position), "Qhd4");
}

#[test]
fn pinned_piece_cannot_move() {
    let position = Position::parse_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    assert_eq!(san::parse("Bd3", &position), Err(NotationError::IllegalMove));
    assert!(san::parse("Kd1", &position).is_ok());
}

#[test]
fn castling_through_check_is_illegal() {
    let position = Position::parse_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1").unwrap();
    assert!(!position.is_check());
    // The rook on f2 covers f1, but none of the squares the king crosses on the queenside.
    assert_eq!(san::parse("O-O", &position), Err(NotationError::IllegalMove));
    assert!(san::parse("O-O-O", &position).is_ok());
}

/// The Opera Game, Paris 1858.
#[test]
fn opera_game_reads_back_as_written() {
    let moves = [
        "e4", "e5", "Nf3", "d6", "d4", "Bg4", "dxe5", "Bxf3", "Qxf3", "dxe5", "Bc4", "Nf6",
        "Qb3", "Qe7", "Nc3", "c6", "Bg5", "b5", "Nxb5", "cxb5", "Bxb5+", "Nbd7", "O-O-O",
        "Rd8", "Rxd7", "Rxd7", "Rd1", "Qe6", "Bxd7+", "Nxd7", "Qb8+", "Nxb8", "Rd8#",
    ];
    let mut position = Position::start_position();
    for written in moves {
        let move_ = san::parse(written, &position).unwrap();
        assert_eq!(san::encode(move_, &position), written);
        position = position.apply_move(move_);
    }
    assert!(position.is_checkmate());
}
