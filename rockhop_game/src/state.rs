// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Game state and the move decision table.

use crate::fall_queue::FallQueue;
use crate::side::Side;

/// Whether a move is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activity {
    /// Accepting input.
    #[default]
    Idle,
    /// A move is animating; directional input is dropped.
    Busy,
}

/// The move a directional input turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// The upcoming rock is on the other side and the input points at it.
    JumpAcross {
        /// Side the character lands on.
        to: Side,
    },
    /// The upcoming rock is on the character's side and the input points at it.
    JumpUp,
    /// The input points away from the upcoming rock.
    FallIn {
        /// Direction of the failed jump.
        toward: Side,
    },
}

/// Everything the controller tracks besides node geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Side the character stands on.
    pub side: Side,
    /// Side of the upcoming rock.
    pub next_rock: Side,
    /// Re-entrancy guard for input.
    pub activity: Activity,
    /// Recovery queue consulted for moves toward / landings on the left.
    pub left_fall: FallQueue,
    /// Recovery queue consulted for moves toward / landings on the right.
    pub right_fall: FallQueue,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            side: Side::Left,
            next_rock: Side::Right,
            activity: Activity::Idle,
            left_fall: FallQueue::from_moves([Side::Left]),
            right_fall: FallQueue::new(),
        }
    }
}

impl GameState {
    /// Returns true while a move is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity == Activity::Busy
    }

    /// The recovery queue for `side`.
    pub fn fall_queue(&self, side: Side) -> &FallQueue {
        match side {
            Side::Left => &self.left_fall,
            Side::Right => &self.right_fall,
        }
    }

    /// The recovery queue for `side`, mutably.
    pub fn fall_queue_mut(&mut self, side: Side) -> &mut FallQueue {
        match side {
            Side::Left => &mut self.left_fall,
            Side::Right => &mut self.right_fall,
        }
    }

    /// Decide what input `direction` does from the current state.
    ///
    /// Only the upcoming rock's side decides between a jump and a fall: input
    /// away from it falls in. Input toward it jumps across, or jumps up in place
    /// when the character already stands on that side. So standing left with
    /// the upcoming rock on the left, `Left` is a [`Move::JumpUp`], not a fall.
    /// The next rock after that jump comes from the left recovery queue when it
    /// has entries, which it does in the initial state.
    pub fn classify(&self, direction: Side) -> Move {
        if self.next_rock != direction {
            Move::FallIn { toward: direction }
        } else if self.side == direction {
            Move::JumpUp
        } else {
            Move::JumpAcross { to: direction }
        }
    }

    /// Queue the corrective move for a fall toward `direction` and pop the
    /// landing side.
    ///
    /// The corrective sequence is the side the character stands on, which always
    /// has a rock under it. Older entries in the same queue are replayed first.
    pub fn recovery_landing(&mut self, direction: Side) -> Side {
        let standing = self.side;
        let queue = self.fall_queue_mut(direction);
        queue.push_back(standing);
        queue.pop_front().unwrap_or(standing)
    }

    /// Pop a queued upcoming-rock side after landing on `landed`, if any.
    pub fn take_queued_next(&mut self, landed: Side) -> Option<Side> {
        self.fall_queue_mut(landed).pop_front()
    }
}
