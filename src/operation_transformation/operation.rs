use core::fmt::{Debug, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single step of a `Changeset`: either reuse a character of the old text
/// or introduce new text.
///
/// With the `serde` feature, `Retain` is encoded as a bare number and `Insert`
/// as a bare string, so a list of operations reads like `[0, 1, "si", 7]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// The character at this (0-based, character) index of the old text is
    /// kept unchanged at this position of the new text.
    Retain(usize),

    /// A non-empty run of new text inserted at this position.
    Insert(String),
}

impl Operation {
    /// Creates an insert operation. If the text is empty (meaning that the
    /// operation would be a no-op), returns None.
    #[must_use]
    pub fn create_insert(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }

        Some(Operation::Insert(text))
    }

    /// Returns the number of characters the operation contributes to the new
    /// text.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Operation::Retain(_) => 1,
            Operation::Insert(text) => text.chars().count(),
        }
    }

    /// Only an `Insert("")` is empty and such operations are never created by
    /// this crate.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    #[must_use]
    pub fn retained_index(&self) -> Option<usize> {
        match self {
            Operation::Retain(index) => Some(*index),
            Operation::Insert(_) => None,
        }
    }

    #[must_use]
    pub fn inserted_text(&self) -> Option<&str> {
        match self {
            Operation::Retain(_) => None,
            Operation::Insert(text) => Some(text),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Operation::Retain(index) => write!(f, "<retain {index}>"),
            Operation::Insert(text) => write!(f, "<insert '{}'>", text.replace('\n', "\\n")),
        }
    }
}

impl Debug for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result { write!(f, "{self}") }
}
