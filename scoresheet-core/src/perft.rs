//! Performance Test
//!
//! [Perft](https://www.chessprogramming.org/Perft)
//!
//! A simple debugging and testing function used to count
//! the number of nodes at a specific depth. Used to confirm the legal move
//! generator against published node counts.

use std::ops::{Add, AddAssign};
use std::sync::Mutex;
use std::thread;

use crate::coretypes::PlyKind;
use crate::movelist::MoveList;
use crate::position::Position;

/// Debugging information about results of perft test.
/// nodes: Number of nodes at lowest depth of perft.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PerftInfo {
    pub nodes: u64,
}

impl PerftInfo {
    fn new(nodes: u64) -> Self {
        PerftInfo { nodes }
    }
}

impl Add for PerftInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        PerftInfo {
            nodes: self.nodes + rhs.nodes,
        }
    }
}

impl AddAssign for PerftInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
    }
}

/// Count the number of nodes at a certain depth.
/// This ignores higher terminal nodes.
/// In other words, it counts the number of paths to the given depth.
pub fn perft(position: Position, ply: PlyKind, threads: usize) -> PerftInfo {
    if ply == 0 {
        return PerftInfo::new(1);
    } else if ply <= 2 || threads <= 1 {
        return perft_recurse(&position, ply);
    }

    let legal_moves = Mutex::new(position.legal_moves());
    let total = Mutex::new(PerftInfo::default());

    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| perft_executor(&position, ply, &legal_moves, &total));
        }
    });

    total.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Steals one move at a time from `moves` and runs perft on it, until no moves remain.
/// Then adds the collected count into `total`.
fn perft_executor(
    position: &Position,
    ply: PlyKind,
    moves: &Mutex<MoveList>,
    total: &Mutex<PerftInfo>,
) {
    debug_assert!(ply > 1);
    let steal = || moves.lock().map(|mut moves| moves.pop()).unwrap_or(None);
    let mut perft_info = PerftInfo::default();

    while let Some(move_) = steal() {
        perft_info += perft_recurse(&position.apply_move(move_), ply - 1);
    }

    if let Ok(mut total) = total.lock() {
        *total += perft_info;
    }
}

/// Ply must be non-zero.
fn perft_recurse(position: &Position, ply: PlyKind) -> PerftInfo {
    debug_assert_ne!(ply, 0);
    let legal_moves = position.legal_moves();
    if ply == 1 {
        PerftInfo::new(legal_moves.len() as u64)
    } else {
        legal_moves
            .into_iter()
            .map(|legal_move| perft_recurse(&position.apply_move(legal_move), ply - 1))
            .fold(PerftInfo::default(), Add::add)
    }
}
