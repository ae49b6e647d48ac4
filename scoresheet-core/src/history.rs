//! History of position hashes, used for detecting repeated positions.

use crate::zobrist::HashKind;

/// History tracks repeated positions for the threefold and fivefold repetition rules.
/// It is stateful, in that each push is assumed to be the position reached by the
/// next move of the game, and each pop takes back the most recent move.
///
/// It contains the hashes of all visited positions including the current one,
/// and the indices of positions that earlier positions can never repeat.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct History {
    hash_history: Vec<HashKind>,  // All visited position hashes in order.
    unrepeatables: Vec<usize>,    // Stack of previous heads.
    head: usize,                  // Earliest position that may still repeat.
}

impl History {
    /// Create a new History whose only position is the game's initial position.
    pub fn new(initial_hash: HashKind) -> Self {
        Self {
            hash_history: vec![initial_hash],
            unrepeatables: Vec::new(),
            head: 0,
        }
    }

    /// Pushes the position reached by the next move.
    /// `reached_by_unrepeatable` is true when that move was a capture or pawn move,
    /// after which no earlier position can occur again.
    pub fn push(&mut self, hash: HashKind, reached_by_unrepeatable: bool) {
        self.hash_history.push(hash);

        if reached_by_unrepeatable {
            self.unrepeatables.push(self.head);
            self.head = self.hash_history.len() - 1;
        }
    }

    /// Pops the most recent position. If it was the head, the previous head is restored.
    /// The initial position is never popped.
    pub fn pop(&mut self) {
        if self.hash_history.len() <= 1 {
            return;
        }
        self.hash_history.pop();

        if self.head >= self.hash_history.len() {
            self.head = self.unrepeatables.pop().unwrap_or(0);
        }
    }

    /// Hash of the current position.
    pub fn current(&self) -> HashKind {
        self.hash_history[self.hash_history.len() - 1]
    }

    /// Number of times `hash` occurred since the last unrepeatable move.
    pub fn count(&self, hash: HashKind) -> usize {
        self.hash_history[self.head..]
            .iter()
            .filter(|&&old_hash| old_hash == hash)
            .count()
    }

    /// Number of times the current position has occurred, counting itself.
    pub fn repetitions(&self) -> usize {
        self.count(self.current())
    }

    /// The current position occurred at least three times, a draw either player may claim.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions() >= 3
    }

    /// The current position occurred at least five times, an automatic draw.
    pub fn is_fivefold_repetition(&self) -> bool {
        self.repetitions() >= 5
    }
}
