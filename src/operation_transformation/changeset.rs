use std::collections::{HashMap, hash_map::Entry};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    operation_transformation::{
        ChangesetError, Follow, FollowOperation, MergedChangeset, Operation,
        utils::collapse_inserts::collapse_inserts,
    },
    utils::{lcs::longest_common_subsequence, string_builder::StringBuilder},
};

/// Describes how an old text of `old_len` characters becomes a new text of
/// `new_len` characters through a list of retained old characters and inserted
/// runs of new text.
///
/// A changeset built by this crate always satisfies these invariants:
/// - retained indices are strictly increasing and below `old_len`,
/// - replaying the operations produces exactly `new_len` characters,
/// - inserts are non-empty and never adjacent.
///
/// Changesets received from elsewhere can be checked with
/// [`Changeset::validate`]; applying and merging validate implicitly.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Changeset {
    old_len: usize,
    new_len: usize,
    operations: Vec<Operation>,
}

impl Changeset {
    /// Create a changeset from its parts without checking the invariants.
    #[must_use]
    pub fn new(old_len: usize, new_len: usize, operations: Vec<Operation>) -> Self {
        Self {
            old_len,
            new_len,
            operations,
        }
    }

    /// Create a changeset describing the change from `old` to `new` based on
    /// their longest common subsequence. The result applied to `old` produces
    /// `new`.
    ///
    /// ```
    /// use converge_text::{Changeset, Operation};
    ///
    /// let changeset = Changeset::from_strings("cat", "bats");
    ///
    /// assert_eq!(
    ///     changeset.operations(),
    ///     &[
    ///         Operation::Insert("b".to_owned()),
    ///         Operation::Retain(1),
    ///         Operation::Retain(2),
    ///         Operation::Insert("s".to_owned()),
    ///     ]
    /// );
    /// assert_eq!(changeset.apply("cat").unwrap(), "bats");
    /// ```
    #[must_use]
    pub fn from_strings(old: &str, new: &str) -> Self {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();
        let alignment = longest_common_subsequence(&old, &new);

        Self::build(old.len(), &new, &alignment)
    }

    /// Create a changeset from `old` to `new` given an alignment of the two
    /// texts, such as the one returned by
    /// [`longest_common_subsequence`](crate::longest_common_subsequence).
    ///
    /// # Errors
    ///
    /// Returns `ChangesetError::IndexOutOfRange` if a pair of the alignment
    /// points outside of `old` or `new`, or if it isn't after the previous
    /// pair in both texts. `position` is the index of the offending pair.
    pub fn from_alignment(
        old: &str,
        new: &str,
        alignment: &[(usize, usize)],
    ) -> Result<Self, ChangesetError> {
        let old_len = old.chars().count();
        let new: Vec<char> = new.chars().collect();

        let mut next_allowed = (0, 0);
        for (position, &(old_index, new_index)) in alignment.iter().enumerate() {
            if old_index < next_allowed.0 || old_index >= old_len {
                return Err(ChangesetError::IndexOutOfRange {
                    position,
                    index: old_index,
                    limit: old_len,
                });
            }

            if new_index < next_allowed.1 || new_index >= new.len() {
                return Err(ChangesetError::IndexOutOfRange {
                    position,
                    index: new_index,
                    limit: new.len(),
                });
            }

            next_allowed = (old_index + 1, new_index + 1);
        }

        Ok(Self::build(old_len, &new, alignment))
    }

    fn build(old_len: usize, new: &[char], alignment: &[(usize, usize)]) -> Self {
        let mut operations = Vec::with_capacity(2 * alignment.len() + 1);
        let mut cursor = 0;

        for &(old_index, new_index) in alignment {
            debug_assert!(
                new_index >= cursor && old_index < old_len,
                "Alignment pair ({old_index}, {new_index}) is out of order or out of range"
            );

            operations.extend(Operation::create_insert(
                new[cursor..new_index].iter().collect::<String>(),
            ));
            operations.push(Operation::Retain(old_index));
            cursor = new_index + 1;
        }

        operations.extend(Operation::create_insert(
            new[cursor..].iter().collect::<String>(),
        ));

        Self::new(old_len, new.len(), collapse_inserts(operations))
    }

    /// Length of the text the changeset applies to, in characters.
    #[must_use]
    pub fn old_len(&self) -> usize { self.old_len }

    /// Length of the text the changeset produces, in characters.
    #[must_use]
    pub fn new_len(&self) -> usize { self.new_len }

    #[must_use]
    pub fn operations(&self) -> &[Operation] { &self.operations }

    #[must_use]
    pub fn into_operations(self) -> Vec<Operation> { self.operations }

    /// Returns true if applying the changeset leaves every text unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.old_len == self.new_len
            && self.operations.len() == self.old_len
            && self
                .operations
                .iter()
                .enumerate()
                .all(|(position, operation)| *operation == Operation::Retain(position))
    }

    /// Returns the same changeset with adjacent inserts joined and empty
    /// inserts removed. The text it produces doesn't change.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            operations: collapse_inserts(self.operations),
            ..self
        }
    }

    /// Returns `(retained index, position within the operations)` pairs in
    /// increasing order.
    pub(crate) fn retained_positions(&self) -> Vec<(usize, usize)> {
        self.operations
            .iter()
            .enumerate()
            .filter_map(|(position, operation)| {
                operation.retained_index().map(|index| (index, position))
            })
            .collect()
    }

    /// Returns a mask of the old text telling which characters are retained.
    pub(crate) fn retention_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.old_len];
        for index in self.operations.iter().filter_map(Operation::retained_index) {
            if let Some(kept) = mask.get_mut(index) {
                *kept = true;
            }
        }

        mask
    }

    /// Check the invariants of the changeset without needing the old text.
    ///
    /// # Errors
    ///
    /// - `ChangesetError::IndexOutOfRange` if a retained index is not below
    ///   `old_len` or not after the previously retained index.
    /// - `ChangesetError::EmptyInsert` if an insert carries no text.
    /// - `ChangesetError::LengthMismatch` if the operations don't produce
    ///   `new_len` characters.
    pub fn validate(&self) -> Result<(), ChangesetError> {
        let mut next_allowed_index = 0;
        let mut produced_length: usize = 0;

        for (position, operation) in self.operations.iter().enumerate() {
            match operation {
                Operation::Retain(index) => {
                    if *index < next_allowed_index || *index >= self.old_len {
                        return Err(ChangesetError::IndexOutOfRange {
                            position,
                            index: *index,
                            limit: self.old_len,
                        });
                    }

                    next_allowed_index = index + 1;
                    produced_length += 1;
                }
                Operation::Insert(text) => {
                    if text.is_empty() {
                        return Err(ChangesetError::EmptyInsert { position });
                    }

                    produced_length += text.chars().count();
                }
            }
        }

        if produced_length != self.new_len {
            return Err(ChangesetError::LengthMismatch {
                expected: self.new_len,
                actual: produced_length,
            });
        }

        Ok(())
    }

    /// Apply the changeset to the text it was built against and return the
    /// new text.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Changeset::validate`], and
    /// `ChangesetError::TextLengthMismatch` if `text` isn't `old_len`
    /// characters long.
    pub fn apply(&self, text: &str) -> Result<String, ChangesetError> {
        self.validate()
            .inspect_err(|error| tracing::debug!(%error, "rejected changeset"))?;

        let text_length = text.chars().count();
        if text_length != self.old_len {
            return Err(ChangesetError::TextLengthMismatch {
                expected: self.old_len,
                actual: text_length,
            });
        }

        let mut builder = StringBuilder::new(text);
        for operation in &self.operations {
            match operation {
                Operation::Retain(index) => builder.retain(*index),
                Operation::Insert(inserted) => builder.insert(inserted),
            }
        }

        Ok(builder.take())
    }

    /// Merge two changesets built against the same text. `self` is treated as
    /// the left and `other` as the right side. See [`MergedChangeset`] for
    /// the rules.
    ///
    /// # Errors
    ///
    /// Returns `ChangesetError::BaseMismatch` if the changesets have different
    /// `old_len`s, and the errors of [`Changeset::validate`] for either input.
    pub fn merge(&self, other: &Changeset) -> Result<MergedChangeset, ChangesetError> {
        MergedChangeset::new(self, other)
    }

    /// Compute the follow mapping that turns the output of `self` into the
    /// output of `merged`, where `merged` was merged from `self` and another
    /// changeset.
    ///
    /// Entries are found by value: a retain of `merged` refers to the same
    /// retain of `self`, and an insert refers to the insert of `self` with the
    /// same text when exactly one such insert exists. Every other insert came
    /// from the other side and is inserted literally. When the
    /// [`MergedChangeset`] itself is at hand, [`MergedChangeset::follow`]
    /// doesn't need to guess.
    ///
    /// # Errors
    ///
    /// - `ChangesetError::BaseMismatch` if the changesets have different
    ///   `old_len`s.
    /// - `ChangesetError::UnknownRetain` if `merged` retains a character that
    ///   `self` doesn't.
    /// - The errors of [`Changeset::validate`] for either changeset.
    pub fn follow(&self, merged: &Changeset) -> Result<Follow, ChangesetError> {
        if self.old_len != merged.old_len {
            return Err(ChangesetError::BaseMismatch {
                left: self.old_len,
                right: merged.old_len,
            });
        }

        self.validate()?;
        merged.validate()?;

        let retained_positions = self.retained_positions();

        let mut unique_inserts: HashMap<&str, Option<usize>> = HashMap::new();
        for (position, operation) in self.operations.iter().enumerate() {
            if let Some(text) = operation.inserted_text() {
                match unique_inserts.entry(text) {
                    Entry::Vacant(entry) => {
                        entry.insert(Some(position));
                    }
                    Entry::Occupied(mut entry) => {
                        entry.insert(None);
                    }
                }
            }
        }

        let operations = merged
            .operations
            .iter()
            .map(|operation| match operation {
                Operation::Retain(index) => retained_positions
                    .binary_search_by_key(index, |&(index, _)| index)
                    .map(|found| FollowOperation::Keep(retained_positions[found].1))
                    .map_err(|_| ChangesetError::UnknownRetain { index: *index }),
                Operation::Insert(text) => Ok(unique_inserts
                    .get(text.as_str())
                    .copied()
                    .flatten()
                    .map_or_else(
                        || FollowOperation::Insert(text.clone()),
                        FollowOperation::Keep,
                    )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Follow::new(self, operations, merged.new_len))
    }
}
