//! Scoresheet Core error type.
//!
//! These errors cover parsing of the core value types (squares, pieces,
//! castling rights, FEN strings, game results). Move entry errors live with
//! the components that raise them: [`crate::san::NotationError`] and
//! [`crate::game::MoveError`].

use std::error;
use std::fmt::{self, Display};
use std::result;

/// Scoresheet Core generic result type.
pub type Result<T> = result::Result<T, Error>;

/// A list specifying general errors for Scoresheet Core.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Square parse string malformed.
    ParseSquareMalformed,
    /// File parse string malformed.
    ParseFileMalformed,
    /// Rank parse string malformed.
    ParseRankMalformed,
    /// Color parse string malformed.
    ParseColorMalformed,
    /// Piece parse string malformed.
    ParsePieceMalformed,
    /// Castling parse string malformed.
    ParseCastlingMalformed,
    /// Game result token is not one of `1-0`, `0-1`, `1/2-1/2`, `*`.
    ParseResultMalformed,

    /// Fen string does not have the expected fields or characters.
    FenMalformed,
    /// Fen string is well formed but describes a position that cannot be played from.
    FenIllegalPosition,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseSquareMalformed => "parse square malformed",
            ErrorKind::ParseFileMalformed => "parse file malformed",
            ErrorKind::ParseRankMalformed => "parse rank malformed",
            ErrorKind::ParseColorMalformed => "parse color malformed",
            ErrorKind::ParsePieceMalformed => "parse piece malformed",
            ErrorKind::ParseCastlingMalformed => "parse castling malformed",
            ErrorKind::ParseResultMalformed => "parse result malformed",

            ErrorKind::FenMalformed => "fen malformed",
            ErrorKind::FenIllegalPosition => "fen illegal position",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The primary and general error type for Scoresheet Core.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    Simple(ErrorKind),
    Message(ErrorKind, String),
}

impl Error {
    /// Returns the kind of this error, regardless of attached message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Simple(error_kind) | Error::Message(error_kind, _) => *error_kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Simple(error_kind) => {
                write!(f, "{error_kind}")
            }
            Error::Message(error_kind, string) => {
                write!(f, "{error_kind}: {string}")
            }
        }
    }
}

impl error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Self::Simple(error_kind)
    }
}

impl<S: ToString> From<(ErrorKind, S)> for Error {
    fn from((error_kind, stringable): (ErrorKind, S)) -> Self {
        Self::Message(error_kind, stringable.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let simple = Error::from(ErrorKind::ParseSquareMalformed);
        assert_eq!(simple.to_string(), "parse square malformed");

        let message = Error::from((ErrorKind::FenMalformed, "expected 8 ranks"));
        assert_eq!(message.to_string(), "fen malformed: expected 8 ranks");
        assert_eq!(message.kind(), ErrorKind::FenMalformed);
    }
}
