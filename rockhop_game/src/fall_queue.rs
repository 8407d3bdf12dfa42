// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded recovery queue of forced moves.

use heapless::Deque;

use crate::side::Side;

/// Maximum number of queued moves per side.
pub const FALL_QUEUE_CAPACITY: usize = 4;

/// A bounded FIFO of sides.
///
/// Moves are pushed at the back and popped from the front. Pushing onto a full
/// queue evicts the front (oldest) entry, so the queue always holds the most
/// recent [`FALL_QUEUE_CAPACITY`] moves.
#[derive(Clone, Debug)]
pub struct FallQueue {
    moves: Deque<Side, FALL_QUEUE_CAPACITY>,
}

impl Default for FallQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FallQueue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for FallQueue {}

impl FallQueue {
    /// An empty queue.
    pub const fn new() -> Self {
        Self {
            moves: Deque::new(),
        }
    }

    /// A queue holding `moves` in order (front first), keeping the last
    /// [`FALL_QUEUE_CAPACITY`] if there are more.
    pub fn from_moves(moves: impl IntoIterator<Item = Side>) -> Self {
        let mut queue = Self::new();
        for side in moves {
            queue.push_back(side);
        }
        queue
    }

    /// Append a move, returning the entry evicted to make room, if any.
    pub fn push_back(&mut self, side: Side) -> Option<Side> {
        let evicted = if self.moves.is_full() {
            self.moves.pop_front()
        } else {
            None
        };
        match self.moves.push_back(side) {
            Ok(()) => evicted,
            Err(rejected) => {
                debug_assert!(false, "push into a queue with a free slot failed");
                Some(rejected)
            }
        }
    }

    /// Take the oldest move.
    pub fn pop_front(&mut self) -> Option<Side> {
        self.moves.pop_front()
    }

    /// The oldest move, without removing it.
    pub fn front(&self) -> Option<Side> {
        self.moves.front().copied()
    }

    /// Number of queued moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if no move is queued.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns true if the next push evicts.
    pub fn is_full(&self) -> bool {
        self.moves.is_full()
    }

    /// Queued moves, front first.
    pub fn iter(&self) -> impl Iterator<Item = Side> + '_ {
        self.moves.iter().copied()
    }
}
