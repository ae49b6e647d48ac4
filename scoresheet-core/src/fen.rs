//! Forsyth-Edwards Notation, a standard notation for describing a chess position.
//! <https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation>
//!
//! Example:
//! Starting Chess FEN = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"

use std::convert::TryFrom;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::boardrepr::{Mailbox, PieceSets};
use crate::coretypes::{Castling, Color, MoveCount, Piece, PieceKind, Rank, Square};
use crate::coretypes::{NUM_FILES, NUM_RANKS};
use crate::error::{self, ErrorKind};
use crate::position::Position;

/// FEN string of the standard chess start position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Allows converting data to and from a FEN string.
pub trait Fen: Sized {
    /// Parse a complete FEN string. The halfmove and fullmove fields may be omitted,
    /// defaulting to 0 and 1.
    fn parse_fen(s: &str) -> error::Result<Self>;

    /// Returns this data as a complete FEN string.
    fn to_fen(&self) -> String;
}

impl Fen for Position {
    fn parse_fen(s: &str) -> error::Result<Self> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err((ErrorKind::FenMalformed, "expected 4 or 6 space separated fields").into());
        }

        let pieces = parse_placement(fields[0])?;
        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err((ErrorKind::FenMalformed, "side to move not of w|b").into()),
        };
        let castling = Castling::from_str(fields[2])?;
        let en_passant = match fields[3] {
            "-" => None,
            square => Some(Square::from_str(square)?),
        };
        let (halfmoves, fullmoves) = match fields.get(4..6) {
            Some(&[halfmoves, fullmoves]) => (parse_counter(halfmoves)?, parse_counter(fullmoves)?),
            _ => (0, 1),
        };
        if fullmoves == 0 {
            return Err((ErrorKind::FenMalformed, "fullmove number starts at 1").into());
        }

        let position = Position {
            pieces,
            side_to_move,
            castling,
            en_passant,
            halfmoves,
            fullmoves,
        };
        validate(&position)?;
        Ok(position)
    }

    fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            placement_string(&self.pieces),
            self.side_to_move.to_char(),
            self.castling,
            self.en_passant.map_or_else(|| "-".to_string(), |sq| sq.to_string()),
            self.halfmoves,
            self.fullmoves,
        )
    }
}

impl FromStr for Position {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        Self::parse_fen(s)
    }
}

fn parse_counter(s: &str) -> error::Result<MoveCount> {
    s.parse::<MoveCount>().map_err(|_| {
        let message = format!("move counter '{s}' is not a number");
        (ErrorKind::FenMalformed, message).into()
    })
}

/// Placement ::= Rank8 '/' Rank7 '/' ... '/' Rank1
fn parse_placement(s: &str) -> error::Result<PieceSets> {
    let ranks: Vec<&str> = s.split('/').collect();
    if ranks.len() != NUM_RANKS {
        return Err((ErrorKind::FenMalformed, "placement needs 8 ranks").into());
    }

    let mut mailbox = Mailbox::new();
    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = NUM_RANKS - 1 - row;
        let mut file = 0usize;
        for ch in rank_str.chars() {
            match ch {
                '1'..='8' => file += ch as usize - '0' as usize,
                _ => {
                    let piece = Piece::try_from(ch)
                        .map_err(|_| (ErrorKind::FenMalformed, format!("unknown piece '{ch}'")))?;
                    if file >= NUM_FILES {
                        let message = format!("rank {} is over 8 squares", rank + 1);
                        return Err((ErrorKind::FenMalformed, message).into());
                    }
                    mailbox[rank * NUM_FILES + file] = Some(piece);
                    file += 1;
                }
            }
        }
        if file != NUM_FILES {
            let message = format!("rank {} is not 8 squares", rank + 1);
            return Err((ErrorKind::FenMalformed, message).into());
        }
    }
    Ok(PieceSets::from(&mailbox))
}

fn placement_string(pieces: &PieceSets) -> String {
    let mailbox = Mailbox::from(pieces);
    let mut placement = String::with_capacity(72);

    for rank in (0..NUM_RANKS).rev() {
        let mut empty = 0u8;
        for file in 0..NUM_FILES {
            match mailbox[rank * NUM_FILES + file] {
                Some(piece) => {
                    if empty > 0 {
                        placement.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    placement.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            placement.push((b'0' + empty) as char);
        }
        if rank > 0 {
            placement.push('/');
        }
    }
    placement
}

/// Rejects positions a game could never be played from.
fn validate(position: &Position) -> error::Result<()> {
    let illegal = |msg: &str| -> error::Error { (ErrorKind::FenIllegalPosition, msg).into() };

    for color in Color::iter() {
        if position.pieces[(color, PieceKind::King)].len() != 1 {
            return Err(illegal("each side needs exactly one king"));
        }
    }
    let pawns = position.pieces[(Color::White, PieceKind::Pawn)]
        | position.pieces[(Color::Black, PieceKind::Pawn)];
    if pawns.has_any(Bitboard::BACK_RANKS) {
        return Err(illegal("pawns cannot stand on the first or last rank"));
    }
    if let Some(ep_square) = position.en_passant {
        let expected = match position.side_to_move {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        if ep_square.rank() != expected {
            return Err(illegal("en passant square is on the wrong rank"));
        }
    }
    let waiting = !position.side_to_move;
    if position.is_attacked(position.king_square(waiting), position.side_to_move) {
        return Err(illegal("side not to move is in check"));
    }
    Ok(())
}
