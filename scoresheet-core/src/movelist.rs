//! MoveList types used in Scoresheet Core.
//!
//! The underlying type of MoveList may change, so a type alias keeps changes easy.

use arrayvec::ArrayVec;

use crate::coretypes::{Move, MAX_MOVES};

/// MoveList is a container that can hold at most `MAX_MOVES`,
/// the most number of moves per any chess position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;
