//! Game session: the record of a game as it is written on a scoresheet.
//!
//! A [`GameSession`] stores each half-move as the SAN the player entered and keeps
//! the position reached by those moves. A half-move is accepted only when it is a
//! legal move of the current position, so the stored notation and the board never
//! disagree.

use std::error;
use std::fmt::{self, Display};
use std::iter;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::coretypes::Color;
use crate::error::ErrorKind;
use crate::history::History;
use crate::position::Position;
use crate::san::{self, NotationError, San};
use crate::zobrist::ZobristTable;

/// One numbered line of the scoresheet.
/// The black half is missing only for the last record of a game that ended after a white move.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MoveRecord {
    white: String,
    black: Option<String>,
}

impl MoveRecord {
    pub fn new<S: Into<String>>(white: S, black: Option<S>) -> Self {
        Self {
            white: white.into(),
            black: black.map(Into::into),
        }
    }

    pub fn white(&self) -> &str {
        &self.white
    }

    pub fn black(&self) -> Option<&str> {
        self.black.as_deref()
    }

    /// Returns true if both halves of this record were played.
    pub fn is_complete(&self) -> bool {
        self.black.is_some()
    }
}

/// Prints the halves separated by a space, e.g. `e4 e5` or `e4`.
impl Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.black {
            Some(black) => write!(f, "{} {}", self.white, black),
            None => f.write_str(&self.white),
        }
    }
}

/// Outcome of a game, written with its PGN token.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    #[default]
    Unknown,
}

impl GameResult {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameResult {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-0" => Ok(GameResult::WhiteWins),
            "0-1" => Ok(GameResult::BlackWins),
            "1/2-1/2" => Ok(GameResult::Draw),
            "*" => Ok(GameResult::Unknown),
            other => Err((
                ErrorKind::ParseResultMalformed,
                format!("Invalid result: {other}. Must be one of 1-0, 0-1, 1/2-1/2, *"),
            )
                .into()),
        }
    }
}

/// State of the board in the current position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameStatus {
    Normal,
    Check,
    Checkmate,
    Stalemate,
    DrawInsufficientMaterial,
    DrawFiftyMove,
    DrawRepetitionAvailable,
}

impl GameStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Normal => "",
            GameStatus::Check => "Check",
            GameStatus::Checkmate => "Checkmate!",
            GameStatus::Stalemate => "Stalemate",
            GameStatus::DrawInsufficientMaterial => "Draw (insufficient material)",
            GameStatus::DrawFiftyMove => "Draw available (50-move rule)",
            GameStatus::DrawRepetitionAvailable => "Draw available (threefold repetition)",
        }
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A session is finished once a result has been set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SessionState {
    InProgress,
    Finished(GameResult),
}

/// Reasons a move cannot be entered into, or edited in, a session.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum MoveError {
    EmptyInput,
    MalformedNotation(String),
    IllegalMove,
    AmbiguousMove,
    /// The move was entered for the side not to move.
    WrongTurn { expected: Color },
    /// A black move was entered while no white move waits for its reply.
    NoPendingWhiteMove,
    /// Move number is not on the scoresheet.
    InvalidIndex { number: usize },
    /// The record has no black half.
    NoBlackMoveToEdit,
    /// The edited move is legal, but a later recorded move no longer is.
    InvalidatesLaterMove {
        number: usize,
        color: Color,
        reason: NotationError,
    },
}

impl From<NotationError> for MoveError {
    fn from(error: NotationError) -> Self {
        match error {
            NotationError::EmptyInput => MoveError::EmptyInput,
            NotationError::MalformedNotation(message) => MoveError::MalformedNotation(message),
            NotationError::IllegalMove => MoveError::IllegalMove,
            NotationError::AmbiguousMove => MoveError::AmbiguousMove,
        }
    }
}

impl Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::EmptyInput => Display::fmt(&NotationError::EmptyInput, f),
            MoveError::MalformedNotation(message) => f.write_str(message),
            MoveError::IllegalMove => Display::fmt(&NotationError::IllegalMove, f),
            MoveError::AmbiguousMove => Display::fmt(&NotationError::AmbiguousMove, f),
            MoveError::WrongTurn { expected } => write!(f, "It's {expected}'s turn to move"),
            MoveError::NoPendingWhiteMove => {
                f.write_str("Cannot add black move without a white move first")
            }
            MoveError::InvalidIndex { number } => write!(f, "Invalid move number: {number}"),
            MoveError::NoBlackMoveToEdit => f.write_str("This move pair has no black move to edit"),
            MoveError::InvalidatesLaterMove {
                number,
                color,
                reason,
            } => write!(
                f,
                "This edit would create an illegal position: \
                 {color}'s move {number} is no longer valid ({reason})"
            ),
        }
    }
}

impl error::Error for MoveError {}

/// GameSession records a game from the standard start position.
///
/// Moves are entered one half-move at a time. A white move stays pending until
/// black replies, then both halves form a [`MoveRecord`]. The session keeps every
/// position reached so undo is a pop, while an edit replays the whole scoresheet
/// and only replaces the session state when every move still resolves.
#[derive(Debug, Clone)]
pub struct GameSession {
    base_position: Position,
    records: Vec<MoveRecord>,
    pending_white: Option<String>,
    positions: Vec<Position>, // base_position first, current position last.
    history: History,
    ztable: ZobristTable,
    result: GameResult,
}

/// Sessions are equal when they hold the same scoresheet, positions, and result.
/// Repetition hashes depend on the randomly keyed table, so they are left out.
impl PartialEq for GameSession {
    fn eq(&self, other: &Self) -> bool {
        self.base_position == other.base_position
            && self.records == other.records
            && self.pending_white == other.pending_white
            && self.positions == other.positions
            && self.result == other.result
    }
}

impl Eq for GameSession {}

impl GameSession {
    /// Create an empty session in the standard start position.
    pub fn new() -> Self {
        let base_position = Position::start_position();
        let ztable = ZobristTable::new();
        let history = History::new(ztable.generate_hash(&base_position));

        Self {
            base_position,
            records: Vec::new(),
            pending_white: None,
            positions: vec![base_position],
            history,
            ztable,
            result: GameResult::Unknown,
        }
    }

    /// Enter the next half-move for `color`.
    /// The SAN is stored as entered, without surrounding whitespace.
    pub fn propose_move(&mut self, san: &str, color: Color) -> Result<(), MoveError> {
        let expected = self.side_to_move();
        if color != expected {
            return Err(MoveError::WrongTurn { expected });
        }
        let white = match color {
            Color::White => None,
            Color::Black => Some(self.pending_white.clone().ok_or(MoveError::NoPendingWhiteMove)?),
        };

        let move_ = san::parse(san, self.position())?;
        let position = self.position().apply_move(move_);
        self.positions.push(position);
        self.history
            .push(self.ztable.generate_hash(&position), move_.is_unrepeatable());

        let san = san.trim().to_string();
        debug!("[SESSION] {} played {} ({})", color, san, move_);
        match white {
            None => self.pending_white = Some(san),
            Some(white) => {
                self.pending_white = None;
                self.records.push(MoveRecord::new(white, Some(san)));
            }
        }
        Ok(())
    }

    /// Take back the most recent half-move.
    /// Returns false if there was nothing to take back.
    pub fn undo_half_move(&mut self) -> bool {
        if self.pending_white.take().is_none() {
            match self.records.pop() {
                Some(MoveRecord {
                    white,
                    black: Some(_),
                }) => self.pending_white = Some(white),
                Some(MoveRecord { black: None, .. }) => (),
                None => return false,
            }
        }

        self.positions.pop();
        self.history.pop();
        debug!("[SESSION] undo, {} to move", self.side_to_move());
        true
    }

    /// Replace the half-move of `color` in record `number` (1-indexed) with `san`.
    ///
    /// A pending white move counts as the last record. Every move is replayed from the
    /// start position and the session only changes when all of them still resolve.
    pub fn edit_move(&mut self, number: usize, color: Color, san: &str) -> Result<(), MoveError> {
        san.parse::<San>()?;

        let pending_number = self.records.len() + 1;
        let last_number = match self.pending_white {
            Some(_) => pending_number,
            None => self.records.len(),
        };
        if number < 1 || number > last_number {
            return Err(MoveError::InvalidIndex { number });
        }

        let san = san.trim().to_string();
        let mut records = self.records.clone();
        let mut pending_white = self.pending_white.clone();

        match (records.get_mut(number - 1), color) {
            (Some(record), Color::White) => record.white = san.clone(),
            (Some(MoveRecord { black: Some(black), .. }), Color::Black) => *black = san.clone(),
            (Some(_), Color::Black) => return Err(MoveError::NoBlackMoveToEdit),
            (None, Color::White) => pending_white = Some(san.clone()),
            (None, Color::Black) => return Err(MoveError::NoBlackMoveToEdit),
        }

        let (positions, history) = self
            .replay(&records, pending_white.as_deref(), (number, color))
            .map_err(|error| {
                warn!(
                    "[SESSION] edit of {}'s move {} to {} rejected: {}",
                    color, number, san, error
                );
                error
            })?;

        self.records = records;
        self.pending_white = pending_white;
        self.positions = positions;
        self.history = history;
        debug!("[SESSION] edited {}'s move {} to {}", color, number, san);
        Ok(())
    }

    /// Resolves every half-move of `records` and `pending_white` from the base position.
    /// A failure on the `edited` half-move is reported as its own error, any other
    /// failure as the later move the edit invalidated.
    fn replay(
        &self,
        records: &[MoveRecord],
        pending_white: Option<&str>,
        edited: (usize, Color),
    ) -> Result<(Vec<Position>, History), MoveError> {
        let mut positions = vec![self.base_position];
        let mut history = History::new(self.ztable.generate_hash(&self.base_position));
        let mut position = self.base_position;

        for (number, color, san) in half_moves(records, pending_white) {
            let move_ = san::parse(san, &position).map_err(|reason| {
                if (number, color) == edited {
                    MoveError::from(reason)
                } else {
                    MoveError::InvalidatesLaterMove {
                        number,
                        color,
                        reason,
                    }
                }
            })?;
            position.do_move(move_);
            positions.push(position);
            history.push(self.ztable.generate_hash(&position), move_.is_unrepeatable());
        }

        Ok((positions, history))
    }

    /// Commit a pending white move as an incomplete record.
    /// Used when the game ends after a white move.
    pub fn finalize_pending(&mut self) {
        if let Some(white) = self.pending_white.take() {
            debug!("[SESSION] finalized pending move {}", white);
            self.records.push(MoveRecord::new(white, None));
        }
    }

    /// Set the result of the game. The session never sets a result by itself.
    pub fn set_result(&mut self, result: GameResult) {
        debug!("[SESSION] result set to {}", result);
        self.result = result;
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn state(&self) -> SessionState {
        match self.result {
            GameResult::Unknown => SessionState::InProgress,
            result => SessionState::Finished(result),
        }
    }

    pub fn move_records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn pending_white_san(&self) -> Option<&str> {
        self.pending_white.as_deref()
    }

    pub fn has_pending_white_move(&self) -> bool {
        self.pending_white.is_some()
    }

    /// Number of records, not counting a pending white move.
    pub fn move_count(&self) -> usize {
        self.records.len()
    }

    /// The position the game started from.
    pub fn initial_position(&self) -> &Position {
        &self.base_position
    }

    /// The position reached by every recorded half-move.
    pub fn position(&self) -> &Position {
        // Never empty, holds at least the base position.
        &self.positions[self.positions.len() - 1]
    }

    /// Every position of the game in order, starting with the initial position.
    pub fn position_history(&self) -> &[Position] {
        &self.positions
    }

    pub fn side_to_move(&self) -> Color {
        self.position().side_to_move()
    }

    /// Number of times the current position has occurred, counting itself.
    pub fn repetition_count(&self) -> usize {
        self.history.repetitions()
    }

    /// Status of the current position, the first that applies of
    /// checkmate, stalemate, check, insufficient material, fifty-move rule, and repetition.
    pub fn current_status(&self) -> GameStatus {
        let position = self.position();
        if position.is_checkmate() {
            GameStatus::Checkmate
        } else if position.is_stalemate() {
            GameStatus::Stalemate
        } else if position.is_check() {
            GameStatus::Check
        } else if position.is_insufficient_material() {
            GameStatus::DrawInsufficientMaterial
        } else if position.is_fifty_move_draw() {
            GameStatus::DrawFiftyMove
        } else if self.history.is_threefold_repetition() {
            GameStatus::DrawRepetitionAvailable
        } else {
            GameStatus::Normal
        }
    }

    /// True once a result is set, or the current position ends the game without a claim.
    pub fn is_game_over(&self) -> bool {
        let position = self.position();
        self.result != GameResult::Unknown
            || position.legal_moves().is_empty()
            || position.is_insufficient_material()
            || position.is_seventy_five_move_draw()
            || self.history.is_fivefold_repetition()
    }

    /// Legal moves of the current position in SAN, sorted.
    pub fn legal_moves_san(&self) -> Vec<String> {
        let position = self.position();
        let mut moves: Vec<String> = position
            .legal_moves()
            .iter()
            .map(|move_| san::encode(*move_, position))
            .collect();
        moves.sort();
        moves
    }

    /// Scoresheet as numbered lines, e.g. `1. e4 e5`.
    /// A pending white move is shown on its own last line.
    pub fn moves_display(&self) -> String {
        let pending = self
            .pending_white
            .as_ref()
            .map(|white| MoveRecord::new(white.as_str(), None));
        let lines: Vec<String> = self
            .records
            .iter()
            .map(|record| record.to_string())
            .chain(pending.map(|record| record.to_string()))
            .enumerate()
            .map(|(i, line)| format!("{}. {}", i + 1, line))
            .collect();

        if lines.is_empty() {
            "No moves yet".to_string()
        } else {
            lines.join("\n")
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Every half-move on the scoresheet in playing order, with its move number and color.
fn half_moves<'a>(
    records: &'a [MoveRecord],
    pending_white: Option<&'a str>,
) -> impl Iterator<Item = (usize, Color, &'a str)> + 'a {
    records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| {
            let number = i + 1;
            iter::once((number, Color::White, record.white()))
                .chain(record.black().map(move |black| (number, Color::Black, black)))
        })
        .chain(pending_white.map(|white| (records.len() + 1, Color::White, white)))
}
