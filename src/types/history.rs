#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Side;

/// Describes where a span of a merged text comes from, including base text
/// that the merge dropped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum History {
    Unchanged,
    AddedFromLeft,
    AddedFromRight,
    AddedFromBoth,
    RemovedFromLeft,
    RemovedFromRight,
    RemovedFromBoth,
}

impl History {
    /// The history of text inserted by the given side.
    #[must_use]
    pub fn added_from(side: Side) -> Self {
        match side {
            Side::Left => History::AddedFromLeft,
            Side::Right => History::AddedFromRight,
        }
    }

    /// The history of a base character depending on which sides kept it.
    /// Deletion wins, so a character kept by only one side is removed.
    #[must_use]
    pub fn of_base_character(kept_by_left: bool, kept_by_right: bool) -> Self {
        match (kept_by_left, kept_by_right) {
            (true, true) => History::Unchanged,
            (false, true) => History::RemovedFromLeft,
            (true, false) => History::RemovedFromRight,
            (false, false) => History::RemovedFromBoth,
        }
    }
}
