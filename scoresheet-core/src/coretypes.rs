//! The fundamental and simple types of `scoresheet_core`.

use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::ops::{BitOr, Not};
use std::str::FromStr;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////
pub const NUM_FILES: usize = 8; // A, B, C, D, E, F, G, H
pub const NUM_RANKS: usize = 8; // 1, 2, 3, 4, 5, 6, 7, 8
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

// 6 Black, 6 White of Pawn, Knight, Bishop, Rook, Queen, King.
pub const NUM_PIECE_KINDS: usize = 12;

// The max possible measured number of moves for any chess position.
pub const MAX_MOVES: usize = 218;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Type alias for a count of plies, used for perft depth.
pub type PlyKind = u8;

/// Counter for half-move clock and full-moves.
pub type MoveCount = u16;

/// Color can represent the color of a piece, or a player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

/// Enum variant order and discriminant are important.
/// Must be contiguous and start from 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub(crate) color: Color,
    pub(crate) piece_kind: PieceKind,
}

/// Observe Castling rights for a position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Castling(u8);

/// Castling Enum constants.
impl Castling {
    pub const W_KING: Castling = Castling(0b00000001);
    pub const W_QUEEN: Castling = Castling(0b00000010);
    pub const B_KING: Castling = Castling(0b00000100);
    pub const B_QUEEN: Castling = Castling(0b00001000);
    pub const W_SIDE: Castling = Castling(Self::W_KING.0 | Self::W_QUEEN.0);
    pub const B_SIDE: Castling = Castling(Self::B_KING.0 | Self::B_QUEEN.0);
    pub const ALL: Castling = Castling(Self::W_SIDE.0 | Self::B_SIDE.0);
    pub const NONE: Castling = Castling(0u8);
    pub const ENUMERATIONS: usize = 16; // 16 possibilities for castling rights.
}

/// The wing a king castles towards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

/// Enum variant order and discriminant must be contiguous, start from 0,
/// and be in ascending order ABCDEFGH.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum File {
    A, B, C, D, E, F, G, H = 7u8,
}

/// Enum variant order and discriminant must be contiguous, start from 0,
/// and be in ascending order 12345678.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Rank {
    R1, R2, R3, R4, R5, R6, R7, R8 = 7u8,
}

/// Square
/// Every possible square on a chess board.
/// The order of enums is important, as `Square::A1 as u8` corresponds to
/// that Square's bit position in a bitboard.
/// WARNING: The exact ordering of enums is important for their discriminants.
///          Changing the discriminant of any variant is breaking.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8 = 63u8,
}

/// Move
/// A single chess "half move", or "ply", in context of the Position it was generated from.
/// Besides origin and target squares, a Move remembers which piece moved, what it captured,
/// and whether it was one of the special moves, so that applying it never needs to re-inspect
/// the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) piece: Piece,
    pub(crate) captured: Option<Piece>,
    pub(crate) promotion: Option<PieceKind>,
    pub(crate) castle: Option<CastleSide>,
    pub(crate) en_passant: bool,
}

////////////
// Traits //
////////////

/// SquareIndexable
/// A chessboard has 64 squares on it. SquareIndexable can be implemented
/// for types whose values can map directly to a chess Square's index.
pub trait SquareIndexable {
    /// idx must be implemented.
    /// idx(&self) must return a number between 0-63 inclusive, representing
    /// a square on a chess board in little-endian, rank-file order.
    /// Warning: Values outside of 0-63 may panic or cause undefined behavior.
    fn idx(&self) -> usize;

    /// shift returns a number that represents the bit-index equivalent of a
    /// chess Square on a u64.
    fn shift(&self) -> u64 {
        1u64 << self.idx()
    }
}

// Blanket impl on references of types that are SquareIndexable.
impl<I: SquareIndexable> SquareIndexable for &I {
    fn idx(&self) -> usize {
        I::idx(*self)
    }
}

//////////////////////
/// Implementations //
//////////////////////

impl Color {
    /// FEN compliant conversion.
    pub const fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Capitalized name of the player, as used in messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }

    /// The rank a color's king and rooks start the game on.
    pub const fn back_rank(&self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    pub fn iter() -> impl Iterator<Item = Color> {
        [Color::White, Color::Black].into_iter()
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Not for &Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        Color::not(*self)
    }
}

impl From<Color> for char {
    fn from(color: Color) -> Self {
        color.to_char()
    }
}

impl TryFrom<char> for Color {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            _ => Err((ErrorKind::ParseColorMalformed, "char is not w|b").into()),
        }
    }
}

/// Color ::= 'w' | 'b' | "white" | "black", case insensitive.
impl FromStr for Color {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err((ErrorKind::ParseColorMalformed, "expected white or black").into()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PieceKind {
    /// Kinds a pawn may promote to, in the order they are generated.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// FEN and SAN compliant conversion, defaults as white pieces.
    pub const fn to_char(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parses an uppercase piece letter.
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns true if PieceKind can slide, false otherwise.
    /// Sliding piece_kinds are Rooks, Bishops, and Queens.
    pub const fn is_sliding(&self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)
    }

    pub fn iter() -> impl Iterator<Item = PieceKind> {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King].into_iter()
    }
}

impl Piece {
    pub const fn new(color: Color, piece_kind: PieceKind) -> Self {
        Piece { color, piece_kind }
    }
    /// Immutable Getters.
    pub const fn color(&self) -> Color {
        self.color
    }
    pub const fn piece_kind(&self) -> PieceKind {
        self.piece_kind
    }

    /// Contiguous index of this piece within 0..NUM_PIECE_KINDS.
    /// White pieces occupy the first block of 6, Black the second.
    pub const fn index(&self) -> usize {
        let block = match self.color {
            Color::White => 0,
            Color::Black => 6,
        };
        block + self.piece_kind as usize
    }

    pub const fn to_char(&self) -> char {
        match self.color {
            Color::White => self.piece_kind.to_char(),
            Color::Black => self.piece_kind.to_char().to_ascii_lowercase(),
        }
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> Self {
        piece.to_char()
    }
}

impl TryFrom<char> for Piece {
    type Error = error::Error;
    fn try_from(value: char) -> error::Result<Self> {
        let color = match value.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        let piece_kind = PieceKind::from_char(value.to_ascii_uppercase()).ok_or((
            ErrorKind::ParsePieceMalformed,
            "char is not in PRNBQKprnbqk",
        ))?;
        Ok(Piece { color, piece_kind })
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl Castling {
    /// Make new Castling with all rights of initial chess position.
    pub const fn start_position() -> Self {
        Self::ALL
    }

    /// The single right for a color castling towards a side.
    pub const fn right(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::King) => Self::W_KING,
            (Color::White, CastleSide::Queen) => Self::W_QUEEN,
            (Color::Black, CastleSide::King) => Self::B_KING,
            (Color::Black, CastleSide::Queen) => Self::B_QUEEN,
        }
    }

    /// Rights lost when a piece moves from or is captured on `square`.
    /// Only the initial king and rook squares carry rights.
    pub const fn lost_on(square: Square) -> Self {
        match square {
            Square::E1 => Self::W_SIDE,
            Square::H1 => Self::W_KING,
            Square::A1 => Self::W_QUEEN,
            Square::E8 => Self::B_SIDE,
            Square::H8 => Self::B_KING,
            Square::A8 => Self::B_QUEEN,
            _ => Self::NONE,
        }
    }

    /// Returns underlying bits used to represent Castling rights.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns true if there are no castling rights.
    pub const fn is_none(&self) -> bool {
        self.0 == 0u8
    }

    /// Returns true if Castling mask has all of provided bits.
    pub fn has(&self, rights: Castling) -> bool {
        debug_assert!(rights.is_mask_valid());
        self.0 & rights.0 == rights.0
    }

    /// Returns true if self has any of the provided bits.
    pub fn has_any(&self, rights: Castling) -> bool {
        debug_assert!(rights.is_mask_valid());
        self.0 & rights.0 != 0
    }

    /// Set given bits to '1' on Castling mask.
    pub fn set(&mut self, rights: Castling) {
        debug_assert!(rights.is_mask_valid());
        self.0 |= rights.0;
    }

    /// Set given bits to '0' on Castling mask.
    pub fn clear(&mut self, rights: Castling) {
        debug_assert!(rights.is_mask_valid());
        self.0 &= !rights.0;
    }

    /// Removes all castling rights for a color.
    pub fn clear_color(&mut self, color: Color) {
        match color {
            Color::White => self.clear(Self::W_SIDE),
            Color::Black => self.clear(Self::B_SIDE),
        }
    }

    /// Returns true if all bits set in Castling are valid, and false otherwise.
    pub const fn is_mask_valid(&self) -> bool {
        self.0 <= Self::ALL.0
    }
}

/// Defaults to Castling rights for starting chess position, ALL.
impl Default for Castling {
    fn default() -> Self {
        Self::start_position()
    }
}

impl BitOr for Castling {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Displays in FEN-component format.
impl Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut castling_str = String::with_capacity(4);

        if self.is_none() {
            castling_str.push('-');
        } else {
            if self.has(Self::W_KING) {
                castling_str.push('K');
            }
            if self.has(Self::W_QUEEN) {
                castling_str.push('Q');
            }
            if self.has(Self::B_KING) {
                castling_str.push('k');
            }
            if self.has(Self::B_QUEEN) {
                castling_str.push('q');
            }
        }
        f.write_str(&castling_str)
    }
}

/// Castling ::= '-' | ['K'] ['Q'] ['k'] ['q']
impl FromStr for Castling {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        if s == "-" {
            return Ok(Castling::NONE);
        }
        if s.is_empty() || s.len() > 4 {
            return Err((ErrorKind::ParseCastlingMalformed, "expected - or 1 to 4 of KQkq").into());
        }

        let mut castling_rights = Castling::NONE;
        for ch in s.chars() {
            let right = match ch {
                'K' => Self::W_KING,
                'Q' => Self::W_QUEEN,
                'k' => Self::B_KING,
                'q' => Self::B_QUEEN,
                _ => return Err((ErrorKind::ParseCastlingMalformed, "char not of KQkq").into()),
            };
            castling_rights.set(right);
        }
        Ok(castling_rights)
    }
}

impl File {
    /// File enum variants cover all u8 values from 0-7 inclusive.
    pub const fn from_u8(value: u8) -> Option<Self> {
        use File::*;
        match value {
            0 => Some(A),
            1 => Some(B),
            2 => Some(C),
            3 => Some(D),
            4 => Some(E),
            5 => Some(F),
            6 => Some(G),
            7 => Some(H),
            _ => None,
        }
    }
    /// Get the character representation of File, in lowercase.
    pub const fn to_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl Rank {
    /// Rank enum variants cover all u8 values from 0-7 inclusive.
    pub const fn from_u8(value: u8) -> Option<Self> {
        use Rank::*;
        match value {
            0 => Some(R1),
            1 => Some(R2),
            2 => Some(R3),
            3 => Some(R4),
            4 => Some(R5),
            5 => Some(R6),
            6 => Some(R7),
            7 => Some(R8),
            _ => None,
        }
    }
    pub const fn to_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl TryFrom<char> for File {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'a'..='h' => Ok(Self::from_u8(ch as u8 - b'a').ok_or(ErrorKind::ParseFileMalformed)?),
            _ => Err((ErrorKind::ParseFileMalformed, "file char not of abcdefgh").into()),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            '1'..='8' => Ok(Self::from_u8(ch as u8 - b'1').ok_or(ErrorKind::ParseRankMalformed)?),
            _ => Err((ErrorKind::ParseRankMalformed, "rank char not of 12345678").into()),
        }
    }
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl SquareIndexable for (File, Rank) {
    fn idx(&self) -> usize {
        let &(file, rank) = self;
        NUM_FILES * rank as usize + file as usize
    }
}

impl Square {
    /// Every square in discriminant order, A1 through H8.
    #[rustfmt::skip]
    pub const ALL: [Square; NUM_SQUARES] = {
        use Square::*;
        [
            A1, B1, C1, D1, E1, F1, G1, H1,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A8, B8, C8, D8, E8, F8, G8, H8,
        ]
    };

    /// Square enum variants cover all u8 values from 0-63 inclusive.
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < NUM_SQUARES {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    pub const fn from_coords(file: File, rank: Rank) -> Self {
        Self::ALL[NUM_FILES * rank as usize + file as usize]
    }

    pub fn iter() -> impl Iterator<Item = Square> {
        Self::ALL.into_iter()
    }

    pub const fn file(&self) -> File {
        match File::from_u8(self.file_u8()) {
            Some(file) => file,
            None => unreachable!(),
        }
    }

    pub const fn rank(&self) -> Rank {
        match Rank::from_u8(self.rank_u8()) {
            Some(rank) => rank,
            None => unreachable!(),
        }
    }

    /// Returns 0-based file (0,1,2,3,4,5,6,7), not 1-based chess file.
    pub const fn file_u8(&self) -> u8 {
        *self as u8 % NUM_FILES as u8
    }

    /// Returns 0-based rank (0,1,2,3,4,5,6,7), not 1-based chess rank.
    pub const fn rank_u8(&self) -> u8 {
        *self as u8 / NUM_FILES as u8
    }

    /// Returns true for the dark squares of the board, A1 being dark.
    pub const fn is_dark(&self) -> bool {
        (self.file_u8() + self.rank_u8()) % 2 == 0
    }
}

impl TryFrom<u8> for Square {
    type Error = error::Error;
    fn try_from(value: u8) -> error::Result<Self> {
        Self::from_u8(value)
            .ok_or_else(|| (ErrorKind::ParseSquareMalformed, "index over 63").into())
    }
}

impl From<(File, Rank)> for Square {
    fn from((file, rank): (File, Rank)) -> Self {
        Self::from_coords(file, rank)
    }
}

/// Square::= <fileLetter><rankNumber>
impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        let file = File::try_from(chars.next().ok_or(ErrorKind::ParseSquareMalformed)?)?;
        let rank = Rank::try_from(chars.next().ok_or(ErrorKind::ParseSquareMalformed)?)?;
        if chars.next().is_some() {
            return Err((ErrorKind::ParseSquareMalformed, "trailing characters").into());
        }
        Ok(Square::from((file, rank)))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl SquareIndexable for Square {
    fn idx(&self) -> usize {
        *self as usize
    }
}

impl Move {
    /// A quiet move of `piece` from one square to another.
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            castle: None,
            en_passant: false,
        }
    }

    /// The king move for castling towards `side`.
    pub const fn castling(color: Color, side: CastleSide) -> Self {
        let (from, to) = match (color, side) {
            (Color::White, CastleSide::King) => (Square::E1, Square::G1),
            (Color::White, CastleSide::Queen) => (Square::E1, Square::C1),
            (Color::Black, CastleSide::King) => (Square::E8, Square::G8),
            (Color::Black, CastleSide::Queen) => (Square::E8, Square::C8),
        };
        let mut move_ = Self::new(from, to, Piece::new(color, PieceKind::King));
        move_.castle = Some(side);
        move_
    }

    /// A pawn capturing en passant onto the skipped square `to`.
    pub const fn en_passant(from: Square, to: Square, color: Color) -> Self {
        let mut move_ = Self::new(from, to, Piece::new(color, PieceKind::Pawn));
        move_.captured = Some(Piece::new(color.not_const(), PieceKind::Pawn));
        move_.en_passant = true;
        move_
    }

    pub const fn with_capture(mut self, captured: Option<Piece>) -> Self {
        self.captured = captured;
        self
    }

    pub const fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    // Immutable Getters
    pub const fn from(&self) -> Square {
        self.from
    }
    pub const fn to(&self) -> Square {
        self.to
    }
    pub const fn piece(&self) -> Piece {
        self.piece
    }
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }
    pub const fn castle(&self) -> Option<CastleSide> {
        self.castle
    }
    pub const fn is_en_passant(&self) -> bool {
        self.en_passant
    }

    /// Returns true if this move removes an opposing piece from the board.
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns true if this move was made by a pawn.
    pub const fn is_pawn_move(&self) -> bool {
        matches!(self.piece.piece_kind, PieceKind::Pawn)
    }

    /// Returns true if the position before moving cannot be repeated in the game after the move.
    /// Positions that result from captures or pawn moves cannot be repeated after those moves
    /// because a pawn cannot move backwards, and material cannot be restored.
    pub const fn is_unrepeatable(&self) -> bool {
        self.is_capture() || self.is_pawn_move()
    }

    /// The square of the piece removed by this move, which differs from `to` only for en passant.
    pub const fn capture_square(&self) -> Square {
        if self.en_passant {
            Square::from_coords(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }
}

impl Color {
    // `Not` is not const, this is.
    const fn not_const(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Pure coordinate notation, used for logging.
/// # Example
/// Move { from: A7, to: B8, promotion: Some(Queen) } -> `a7b8q`.
impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece_kind) = self.promotion {
            f.write_char(piece_kind.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
