//! Scoresheet Core
//!
//! Chess rules and move recording for a scoresheet: positions and legal move
//! generation, Standard Algebraic Notation, and a game session that accepts
//! half-moves, takes them back, and edits earlier moves.

pub mod bitboard;
pub mod boardrepr;
pub mod coretypes;
pub mod error;
pub mod fen;
pub mod game;
pub mod history;
pub(crate) mod movegen;
pub mod movelist;
pub mod perft;
pub mod position;
pub mod san;
pub mod zobrist;

pub use coretypes::{Color, Move};
pub use fen::Fen;
pub use game::{GameResult, GameSession, GameStatus, MoveError, MoveRecord, SessionState};
pub use position::Position;
pub use san::NotationError;
