use core::fmt::{Debug, Display};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::operation_transformation::{Changeset, ChangesetError};

/// One entry of a [`Follow`] mapping.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, PartialEq, Eq)]
pub enum FollowOperation {
    /// The output of the source changeset's operation at this position stays.
    Keep(usize),

    /// Text the other side introduced, to be newly inserted here.
    Insert(String),
}

impl Display for FollowOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FollowOperation::Keep(position) => write!(f, "<keep {position}>"),
            FollowOperation::Insert(text) => {
                write!(f, "<insert '{}'>", text.replace('\n', "\\n"))
            }
        }
    }
}

impl Debug for FollowOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result { write!(f, "{self}") }
}

/// Rebases a document that already reflects one side of a merge (the source
/// changeset) onto the merged result.
///
/// There is one entry for each operation of the merged changeset. Next to the
/// entries, the mapping remembers which characters of the source changeset's
/// output each source operation produced, so it can be applied to the
/// materialized document alone.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    operations: Vec<FollowOperation>,
    source_spans: Vec<Range<usize>>,
    source_len: usize,
    target_len: usize,
}

impl Follow {
    pub(crate) fn new(
        source: &Changeset,
        operations: Vec<FollowOperation>,
        target_len: usize,
    ) -> Self {
        let mut offset = 0;
        let source_spans = source
            .operations()
            .iter()
            .map(|operation| {
                let start = offset;
                offset += operation.len();
                start..offset
            })
            .collect();

        debug_assert_eq!(
            offset,
            source.new_len(),
            "Follow must be created from a valid changeset"
        );

        Self {
            operations,
            source_spans,
            source_len: offset,
            target_len,
        }
    }

    #[must_use]
    pub fn operations(&self) -> &[FollowOperation] { &self.operations }

    /// Length of the document the mapping applies to.
    #[must_use]
    pub fn source_len(&self) -> usize { self.source_len }

    /// Length of the document the mapping produces.
    #[must_use]
    pub fn target_len(&self) -> usize { self.target_len }

    /// Apply the mapping to the document produced by the source changeset,
    /// returning the merged document.
    ///
    /// # Errors
    ///
    /// - `ChangesetError::TextLengthMismatch` if `document` isn't the length
    ///   of the source changeset's output.
    /// - `ChangesetError::IndexOutOfRange` if an entry references an operation
    ///   the source changeset doesn't have.
    /// - `ChangesetError::LengthMismatch` if the result isn't `target_len`
    ///   characters long.
    pub fn apply(self, document: &str) -> Result<String, ChangesetError> {
        let characters: Vec<char> = document.chars().collect();
        if characters.len() != self.source_len {
            return Err(ChangesetError::TextLengthMismatch {
                expected: self.source_len,
                actual: characters.len(),
            });
        }

        let mut result = String::with_capacity(document.len());
        let mut produced_length = 0;

        for (position, operation) in self.operations.into_iter().enumerate() {
            match operation {
                FollowOperation::Keep(index) => {
                    let kept = self
                        .source_spans
                        .get(index)
                        .and_then(|span| characters.get(span.clone()))
                        .ok_or(ChangesetError::IndexOutOfRange {
                            position,
                            index,
                            limit: self.source_spans.len(),
                        })?;

                    result.extend(kept);
                    produced_length += kept.len();
                }
                FollowOperation::Insert(text) => {
                    produced_length += text.chars().count();
                    result.push_str(&text);
                }
            }
        }

        if produced_length != self.target_len {
            return Err(ChangesetError::LengthMismatch {
                expected: self.target_len,
                actual: produced_length,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Operation;

    fn basil() -> Changeset {
        Changeset::new(
            8,
            5,
            vec![
                Operation::Retain(0),
                Operation::Retain(1),
                Operation::Insert("si".to_owned()),
                Operation::Retain(7),
            ],
        )
    }

    #[test]
    fn test_source_spans() {
        let follow = Follow::new(&basil(), vec![], 0);

        assert_eq!(follow.source_spans, vec![0..1, 1..2, 2..4, 4..5]);
        assert_eq!(follow.source_len(), 5);
    }

    #[test]
    fn test_apply_keeps_and_inserts() {
        let follow = Follow::new(
            &basil(),
            vec![
                FollowOperation::Keep(0),
                FollowOperation::Insert("e".to_owned()),
                FollowOperation::Keep(2),
                FollowOperation::Insert("ow".to_owned()),
            ],
            6,
        );

        assert_eq!(follow.apply("basil").unwrap(), "besiow");
    }

    #[test]
    fn test_apply_to_wrong_document() {
        let follow = Follow::new(&basil(), vec![FollowOperation::Keep(0)], 1);

        assert_eq!(
            follow.apply("base"),
            Err(ChangesetError::TextLengthMismatch {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn test_apply_missing_operation() {
        let follow = Follow::new(&basil(), vec![FollowOperation::Keep(4)], 1);

        assert_eq!(
            follow.apply("basil"),
            Err(ChangesetError::IndexOutOfRange {
                position: 0,
                index: 4,
                limit: 4
            })
        );
    }

    #[test]
    fn test_apply_length_mismatch() {
        let follow = Follow::new(&basil(), vec![FollowOperation::Keep(2)], 3);

        assert_eq!(
            follow.apply("basil"),
            Err(ChangesetError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_display() {
        insta::assert_debug_snapshot!(
            vec![FollowOperation::Keep(1), FollowOperation::Insert("ow".to_owned())],
            @r"
        [
            <keep 1>,
            <insert 'ow'>,
        ]
        "
        );
    }
}
