//! Primitive actions and queued action bursts

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Debug;

/// Trait for actions in an RL environment
pub trait Action: Clone + Debug + Send + Sync {
    /// Convert action to a vector representation
    fn to_vec(&self) -> Vec<f64>;
}

/// Number of discrete actions exposed by the simulator
pub const NUM_ACTIONS: usize = 9;

/// The nine discrete AnimalAI actions.
///
/// The simulator takes two branches, movement (none, forwards, backwards)
/// and rotation (none, right, left). The flattened index is
/// `movement * 3 + rotation`, which is the encoding used by flattened
/// gym-style wrappers and by the action-bias vectors of the random agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AaiAction {
    /// Stand still
    #[default]
    Noop = 0,
    /// Rotate right on the spot
    Right = 1,
    /// Rotate left on the spot
    Left = 2,
    /// Move forwards
    Forwards = 3,
    /// Move forwards while rotating right
    ForwardsRight = 4,
    /// Move forwards while rotating left
    ForwardsLeft = 5,
    /// Move backwards
    Backwards = 6,
    /// Move backwards while rotating right
    BackwardsRight = 7,
    /// Move backwards while rotating left
    BackwardsLeft = 8,
}

impl AaiAction {
    /// All actions in index order
    pub const ALL: [AaiAction; NUM_ACTIONS] = [
        AaiAction::Noop,
        AaiAction::Right,
        AaiAction::Left,
        AaiAction::Forwards,
        AaiAction::ForwardsRight,
        AaiAction::ForwardsLeft,
        AaiAction::Backwards,
        AaiAction::BackwardsRight,
        AaiAction::BackwardsLeft,
    ];

    /// Flattened action index
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up an action by its flattened index
    pub fn from_index(index: usize) -> crate::Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| {
                crate::RLError::InvalidAction(format!(
                    "action index {index} out of range 0..{NUM_ACTIONS}"
                ))
            })
    }

    /// Branched representation as `(movement, rotation)`
    #[must_use]
    pub fn branches(self) -> (u8, u8) {
        let index = self as u8;
        (index / 3, index % 3)
    }
}

impl Action for AaiAction {
    fn to_vec(&self) -> Vec<f64> {
        vec![self.index() as f64]
    }
}

impl TryFrom<usize> for AaiAction {
    type Error = crate::RLError;

    fn try_from(index: usize) -> crate::Result<Self> {
        Self::from_index(index)
    }
}

/// A sampled burst of primitive actions, consumed front to back one per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionQueue {
    actions: VecDeque<AaiAction>,
}

impl ActionQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` repeated `count` times
    #[must_use]
    pub fn repeat(action: AaiAction, count: usize) -> Self {
        Self {
            actions: std::iter::repeat(action).take(count).collect(),
        }
    }

    /// Append an action at the back
    pub fn push(&mut self, action: AaiAction) {
        self.actions.push_back(action);
    }

    /// Take the next action
    pub fn pop(&mut self) -> Option<AaiAction> {
        self.actions.pop_front()
    }

    /// Peek at the next action
    #[must_use]
    pub fn peek(&self) -> Option<AaiAction> {
        self.actions.front().copied()
    }

    /// Number of queued actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check whether the queue is drained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over the queued actions without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &AaiAction> {
        self.actions.iter()
    }

    /// Count how many queued actions equal `action`
    #[must_use]
    pub fn count_of(&self, action: AaiAction) -> usize {
        self.actions.iter().filter(|a| **a == action).count()
    }
}

impl FromIterator<AaiAction> for ActionQueue {
    fn from_iter<I: IntoIterator<Item = AaiAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl Extend<AaiAction> for ActionQueue {
    fn extend<I: IntoIterator<Item = AaiAction>>(&mut self, iter: I) {
        self.actions.extend(iter);
    }
}

impl Iterator for ActionQueue {
    type Item = AaiAction;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }
}
