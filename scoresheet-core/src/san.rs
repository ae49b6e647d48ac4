//! Standard Algebraic Notation.
//!
//! Parsing happens in two steps. A string is first read into a [`San`], which only
//! knows the shape the player wrote: piece letter, optional origin file and rank,
//! capture marker, destination and promotion. The [`San`] is then resolved against
//! the legal moves of a position, which decides legality and ambiguity.
//!
//! Check and mate suffixes in the input are accepted and not verified. Encoding
//! always computes the correct suffix from the resulting position.

use std::error;
use std::fmt::{self, Display, Write};
use std::str::FromStr;

use crate::coretypes::{CastleSide, File, Move, PieceKind, Rank, Square};
use crate::position::Position;

/// Reasons a SAN string cannot become a move.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum NotationError {
    /// Input was empty or only whitespace.
    EmptyInput,
    /// Input does not have the shape of a SAN move. Holds a message for the player.
    MalformedNotation(String),
    /// Input is well formed but no legal move matches it.
    IllegalMove,
    /// Input matches more than one legal move and needs disambiguation.
    AmbiguousMove,
}

impl NotationError {
    fn malformed<S: ToString>(message: S) -> Self {
        NotationError::MalformedNotation(message.to_string())
    }
}

impl Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NotationError::EmptyInput => f.write_str("Move cannot be empty"),
            NotationError::MalformedNotation(message) => f.write_str(message),
            NotationError::IllegalMove => f.write_str("Illegal move in the current position"),
            NotationError::AmbiguousMove => {
                f.write_str("Ambiguous move: add the origin file or rank of the piece")
            }
        }
    }
}

impl error::Error for NotationError {}

/// A move as written in Standard Algebraic Notation, without check suffix.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum San {
    Normal {
        piece_kind: PieceKind,
        file: Option<File>,
        rank: Option<Rank>,
        capture: bool,
        to: Square,
        promotion: Option<PieceKind>,
    },
    Castle(CastleSide),
}

/// Parses `san` and resolves it against the legal moves of `position`.
pub fn parse(san: &str, position: &Position) -> Result<Move, NotationError> {
    san.parse::<San>()?.to_move(position)
}

/// Encodes a legal move of `position` as SAN, with the minimal disambiguation
/// and a `+` or `#` suffix when the move gives check or mate.
pub fn encode(move_: Move, position: &Position) -> String {
    let mut san = San::from_move(move_, position).to_string();
    let after = position.apply_move(move_);
    if after.is_checkmate() {
        san.push('#');
    } else if after.is_check() {
        san.push('+');
    }
    san
}

impl San {
    /// Resolves this notation to the single legal move of `position` it describes.
    pub fn to_move(&self, position: &Position) -> Result<Move, NotationError> {
        let legal_moves = position.legal_moves();
        let mut candidates = legal_moves.iter().filter(|move_| self.matches(move_));

        match (candidates.next(), candidates.next()) {
            (Some(move_), None) => Ok(*move_),
            (None, _) => Err(NotationError::IllegalMove),
            (Some(_), Some(_)) => Err(NotationError::AmbiguousMove),
        }
    }

    /// Returns true if `move_` fits every part of this notation.
    pub fn matches(&self, move_: &Move) -> bool {
        match *self {
            San::Castle(side) => move_.castle() == Some(side),
            San::Normal {
                piece_kind,
                file,
                rank,
                capture,
                to,
                promotion,
            } => {
                move_.castle().is_none()
                    && move_.piece().piece_kind() == piece_kind
                    && move_.to() == to
                    && file.map_or(true, |file| move_.from().file() == file)
                    && rank.map_or(true, |rank| move_.from().rank() == rank)
                    && move_.is_capture() == capture
                    && move_.promotion() == promotion
            }
        }
    }

    /// Describes a legal move of `position` with the least disambiguation needed.
    /// Pawn captures always name their origin file. Other pieces name the origin
    /// file when it tells them apart from rivals reaching the same square, the rank
    /// when only the rank does, and both when neither does alone.
    pub fn from_move(move_: Move, position: &Position) -> San {
        if let Some(side) = move_.castle() {
            return San::Castle(side);
        }
        let piece_kind = move_.piece().piece_kind();
        let from = move_.from();

        let (file, rank) = if piece_kind == PieceKind::Pawn {
            (Some(from.file()).filter(|_| move_.is_capture()), None)
        } else {
            let (need_file, need_rank) = position
                .legal_moves()
                .iter()
                .filter(|rival| {
                    rival.piece() == move_.piece()
                        && rival.to() == move_.to()
                        && rival.from() != from
                })
                .fold((false, false), |(need_file, need_rank), rival| {
                    if rival.from().file() != from.file() {
                        (true, need_rank)
                    } else {
                        (need_file, true)
                    }
                });
            // File when it separates every rival, rank when only the rank does, otherwise
            // both. Rooks on a1 and a5 write `R1a3`, never `Ra1a3`.
            match (need_file, need_rank) {
                (true, true) => (Some(from.file()), Some(from.rank())),
                (true, false) => (Some(from.file()), None),
                (false, true) => (None, Some(from.rank())),
                (false, false) => (None, None),
            }
        };

        San::Normal {
            piece_kind,
            file,
            rank,
            capture: move_.is_capture(),
            to: move_.to(),
            promotion: move_.promotion(),
        }
    }
}

impl Display for San {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            San::Castle(CastleSide::King) => f.write_str("O-O"),
            San::Castle(CastleSide::Queen) => f.write_str("O-O-O"),
            San::Normal {
                piece_kind,
                file,
                rank,
                capture,
                to,
                promotion,
            } => {
                if piece_kind != PieceKind::Pawn {
                    f.write_char(piece_kind.to_char())?;
                }
                if let Some(file) = file {
                    write!(f, "{file}")?;
                }
                if let Some(rank) = rank {
                    write!(f, "{rank}")?;
                }
                if capture {
                    f.write_char('x')?;
                }
                write!(f, "{to}")?;
                if let Some(promotion) = promotion {
                    write!(f, "={}", promotion.to_char())?;
                }
                Ok(())
            }
        }
    }
}

/// San ::= Castle | PieceMove | PawnMove, each followed by an optional `+` or `#`
/// and optional `!`/`?` annotations.
impl FromStr for San {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NotationError::EmptyInput);
        }
        diagnose(s)?;

        let body = s.trim_end_matches(['!', '?']);
        let body = body.strip_suffix(['+', '#']).unwrap_or(body);

        read_body(body).ok_or_else(|| NotationError::malformed(shape_hint(s)))
    }
}

/// Character level checks that produce a precise message before the shape is read.
fn diagnose(s: &str) -> Result<(), NotationError> {
    let lowered = s.to_ascii_lowercase();
    if (lowered.starts_with("o-o") || s.starts_with("0-0")) && !s.starts_with("O-O") {
        return Err(NotationError::malformed(CASTLING_HINT));
    }

    let mut chars = s.chars();
    if let Some(first @ ('k' | 'q' | 'r' | 'b' | 'n')) = chars.next() {
        let rest = chars.as_str();
        let second = rest.chars().next();
        // `b` doubles as a pawn file, as do squares like `b4` or captures like `bxc3`.
        let pawn_like = match first {
            'b' => matches!(second, Some('1'..='8' | 'x')),
            _ => rest.len() == 1 && matches!(second, Some('1'..='8')),
        };
        if !pawn_like {
            let upper = first.to_ascii_uppercase();
            return Err(NotationError::malformed(format!(
                "Piece notation must be uppercase (use '{upper}{rest}' instead of '{s}')"
            )));
        }
    }

    if let Some(digit) = s.chars().find(|ch| matches!(ch, '0' | '9')) {
        return Err(NotationError::malformed(format!(
            "Invalid rank '{digit}': ranks must be 1-8"
        )));
    }

    let allowed_lowercase = |ch: &char| matches!(ch, 'a'..='h' | 'x' | 'k' | 'q' | 'r' | 'n');
    if let Some(ch) = s
        .chars()
        .find(|ch| ch.is_ascii_lowercase() && !allowed_lowercase(ch))
    {
        return Err(NotationError::malformed(format!("Invalid character '{ch}' in move")));
    }

    if let Some((_, after_eq)) = s.split_once('=') {
        match after_eq.chars().next() {
            Some(piece @ 'A'..='Z') if !matches!(piece, 'Q' | 'R' | 'B' | 'N') => {
                return Err(NotationError::malformed(format!(
                    "Invalid promotion piece '{piece}': can only promote to Q, R, B, or N"
                )));
            }
            Some('A'..='Z') => (),
            _ => {
                return Err(NotationError::malformed(
                    "Invalid promotion format: use '=Q', '=R', '=B', or '=N'",
                ))
            }
        }
    }
    Ok(())
}

/// Reads a SAN body with suffixes removed. None if it has no recognized shape.
fn read_body(body: &str) -> Option<San> {
    match body {
        "O-O" => return Some(San::Castle(CastleSide::King)),
        "O-O-O" => return Some(San::Castle(CastleSide::Queen)),
        _ => (),
    }
    let chars: Vec<char> = body.chars().collect();

    match chars.first().copied().and_then(PieceKind::from_char) {
        Some(PieceKind::Pawn) => None,
        Some(piece_kind) => read_piece_move(piece_kind, &chars[1..]),
        None => read_pawn_move(&chars),
    }
}

/// [a-h]?[1-8]?x?[a-h][1-8]
fn read_piece_move(piece_kind: PieceKind, chars: &[char]) -> Option<San> {
    let (rest, to) = split_square(chars)?;
    let (rest, capture) = match rest.split_last() {
        Some((&'x', rest)) => (rest, true),
        _ => (rest, false),
    };
    let (file, rank) = match *rest {
        [] => (None, None),
        [ch] => match File::try_from(ch) {
            Ok(file) => (Some(file), None),
            Err(_) => (None, Some(Rank::try_from(ch).ok()?)),
        },
        [file, rank] => (Some(File::try_from(file).ok()?), Some(Rank::try_from(rank).ok()?)),
        _ => return None,
    };

    Some(San::Normal {
        piece_kind,
        file,
        rank,
        capture,
        to,
        promotion: None,
    })
}

/// [a-h][1-8] | [a-h]x[a-h][1-8], then `=`[QRBN] exactly when reaching the last rank.
fn read_pawn_move(chars: &[char]) -> Option<San> {
    let (chars, promotion) = match chars {
        [rest @ .., '=', piece] => {
            let promotion = PieceKind::from_char(*piece)
                .filter(|kind| PieceKind::PROMOTIONS.contains(kind))?;
            (rest, Some(promotion))
        }
        _ => (chars, None),
    };
    let (rest, to) = split_square(chars)?;
    let (file, capture) = match *rest {
        [] => (None, false),
        [file, 'x'] => (Some(File::try_from(file).ok()?), true),
        _ => return None,
    };
    let on_last_rank = matches!(to.rank(), Rank::R1 | Rank::R8);
    if promotion.is_some() && !on_last_rank {
        return None;
    }

    Some(San::Normal {
        piece_kind: PieceKind::Pawn,
        file,
        rank: None,
        capture,
        to,
        promotion,
    })
}

/// Splits the trailing destination square off `chars`.
fn split_square(chars: &[char]) -> Option<(&[char], Square)> {
    match chars {
        [rest @ .., file, rank] => {
            let file = File::try_from(*file).ok()?;
            let rank = Rank::try_from(*rank).ok()?;
            Some((rest, Square::from_coords(file, rank)))
        }
        _ => None,
    }
}

const CASTLING_HINT: &str =
    "Invalid castling notation: use 'O-O' (kingside) or 'O-O-O' (queenside) with capital letter O";

/// A message suggesting the right shape for input that has none.
fn shape_hint(s: &str) -> String {
    if s.to_ascii_lowercase().starts_with("o-o") {
        CASTLING_HINT.to_string()
    } else if s.contains('=') {
        "Invalid promotion format: examples - e8=Q, axb8=N, d1=R+".to_string()
    } else if s.contains('x') && s.len() >= 3 {
        "Invalid capture notation: examples - exd5, Nxf6, Bxc4".to_string()
    } else {
        format!(
            "Invalid move format: '{s}'\n\
             Valid examples:\n  \
             - Pawn moves: e4, d5\n  \
             - Piece moves: Nf3, Bb5, Qd4\n  \
             - Captures: exd5, Nxf6\n  \
             - Castling: O-O, O-O-O\n  \
             - Promotion: e8=Q, axb8=N\n  \
             - Check/Checkmate: Nf7+, Qh5#"
        )
    }
}
