use std::ops::Range;

use crate::{
    Side,
    operation_transformation::{
        Changeset, ChangesetError, Follow, FollowOperation, Operation,
        merge_candidate::{MergeCandidate, Origin},
    },
    types::{
        history::History,
        span_with_history::{SpanWithHistory, push_span},
    },
};

/// The result of merging two changesets built against the same base text.
///
/// The merged changeset keeps a base character only if both sides kept it, so
/// a deletion on either side wins. Every insertion of both sides is kept and
/// placed after the retained character it followed on its own side. When both
/// sides insert at the same place, the insertions are ordered by the retained
/// character they precede and then by their text; if both sides inserted the
/// same text there, it appears once.
///
/// The merge is symmetric: `a.merge(&b)` and `b.merge(&a)` produce the same
/// changeset.
///
/// ```
/// use converge_text::{Changeset, Side};
///
/// let base = "hello world";
/// let left = Changeset::from_strings(base, "hello brave world");
/// let right = Changeset::from_strings(base, "hello world!");
///
/// let merged = left.merge(&right).unwrap();
/// assert_eq!(merged.apply(base).unwrap(), "hello brave world!");
///
/// // A collaborator who already applied `left` catches up with `right`.
/// let follow = merged.follow(Side::Left);
/// assert_eq!(follow.apply("hello brave world").unwrap(), "hello brave world!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedChangeset {
    changeset: Changeset,
    origins: Vec<Origin>,
    left: Changeset,
    right: Changeset,
}

impl MergedChangeset {
    pub(super) fn new(left: &Changeset, right: &Changeset) -> Result<Self, ChangesetError> {
        if left.old_len() != right.old_len() {
            return Err(ChangesetError::BaseMismatch {
                left: left.old_len(),
                right: right.old_len(),
            });
        }

        left.validate()
            .and_then(|()| right.validate())
            .inspect_err(|error| tracing::debug!(%error, "refusing to merge invalid changeset"))?;

        let left = left.clone().normalized();
        let right = right.clone().normalized();

        let right_retained = right.retained_positions();
        let mut candidates: Vec<MergeCandidate> = left
            .retained_positions()
            .into_iter()
            .filter_map(|(index, left_position)| {
                right_retained
                    .binary_search_by_key(&index, |&(index, _)| index)
                    .ok()
                    .map(|found| {
                        MergeCandidate::retained(index, left_position, right_retained[found].1)
                    })
            })
            .collect();

        candidates.extend(MergeCandidate::insertions(&left, Side::Left));
        candidates.extend(MergeCandidate::insertions(&right, Side::Right));
        candidates.sort_by(|a, b| a.get_sort_key().cmp(&b.get_sort_key()));

        tracing::trace!(?candidates, "sorted merge candidates");

        let mut deduplicated: Vec<MergeCandidate> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(previous) = deduplicated
                .last_mut()
                .filter(|previous| candidate.is_duplicate_of(previous))
            {
                previous.absorb(candidate);
                continue;
            }

            deduplicated.push(candidate);
        }

        let mut origins: Vec<Origin> = Vec::with_capacity(deduplicated.len());
        for candidate in deduplicated {
            match candidate.origin {
                Origin::Inserted(runs) if matches!(origins.last(), Some(Origin::Inserted(_))) => {
                    if let Some(Origin::Inserted(previous_runs)) = origins.last_mut() {
                        previous_runs.extend(runs);
                    }
                }
                origin => origins.push(origin),
            }
        }

        let operations: Vec<_> = origins.iter().map(Origin::operation).collect();
        let new_len: usize = operations.iter().map(Operation::len).sum();
        let changeset = Changeset::new(left.old_len(), new_len, operations);

        debug_assert_eq!(changeset.validate(), Ok(()));

        tracing::debug!(
            left_operations = left.operations().len(),
            right_operations = right.operations().len(),
            merged_operations = changeset.operations().len(),
            new_len,
            "merged changesets"
        );

        Ok(Self {
            changeset,
            origins,
            left,
            right,
        })
    }

    #[must_use]
    pub fn changeset(&self) -> &Changeset { &self.changeset }

    #[must_use]
    pub fn into_changeset(self) -> Changeset { self.changeset }

    /// The changeset of the given side, with adjacent inserts joined.
    #[must_use]
    pub fn side(&self, side: Side) -> &Changeset {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Apply the merged changeset to the base text.
    ///
    /// # Errors
    ///
    /// Returns `ChangesetError::TextLengthMismatch` if `base` isn't the text
    /// the changesets were built against.
    pub fn apply(&self, base: &str) -> Result<String, ChangesetError> {
        self.changeset.apply(base)
    }

    /// Compute the follow mapping that turns the output of the given side's
    /// changeset into the output of the merged changeset.
    ///
    /// Unlike [`Changeset::follow`], inserted runs are recognised by where they
    /// came from rather than by their text: a run is kept only if it is
    /// exactly one insertion of `side`.
    #[must_use]
    pub fn follow(&self, side: Side) -> Follow {
        let operations = self
            .origins
            .iter()
            .map(|origin| match origin {
                Origin::Retained { left, right, .. } => FollowOperation::Keep(match side {
                    Side::Left => *left,
                    Side::Right => *right,
                }),
                Origin::Inserted(runs) => match runs.as_slice() {
                    [run] => run.position_on(side).map_or_else(
                        || FollowOperation::Insert(run.text.clone()),
                        FollowOperation::Keep,
                    ),
                    _ => FollowOperation::Insert(runs.iter().map(|run| run.text.as_str()).collect()),
                },
            })
            .collect();

        Follow::new(self.side(side), operations, self.changeset.new_len())
    }

    /// Apply the merged changeset to the base text and return the result in
    /// spans, together with where each span came from. Base characters dropped
    /// by the merge are included, placed before the insertions of the same
    /// gap.
    ///
    /// ```
    /// use converge_text::{Changeset, History, SpanWithHistory};
    ///
    /// let base = "cat";
    /// let left = Changeset::from_strings(base, "bat");
    /// let right = Changeset::from_strings(base, "cats");
    ///
    /// let merged = left.merge(&right).unwrap();
    ///
    /// assert_eq!(
    ///     merged.apply_with_history(base).unwrap(),
    ///     vec![
    ///         SpanWithHistory::new("c".to_owned(), History::RemovedFromLeft),
    ///         SpanWithHistory::new("b".to_owned(), History::AddedFromLeft),
    ///         SpanWithHistory::new("at".to_owned(), History::Unchanged),
    ///         SpanWithHistory::new("s".to_owned(), History::AddedFromRight),
    ///     ]
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ChangesetError::TextLengthMismatch` if `base` isn't the text
    /// the changesets were built against.
    pub fn apply_with_history(&self, base: &str) -> Result<Vec<SpanWithHistory>, ChangesetError> {
        let characters: Vec<char> = base.chars().collect();
        let old_len = self.changeset.old_len();
        if characters.len() != old_len {
            return Err(ChangesetError::TextLengthMismatch {
                expected: old_len,
                actual: characters.len(),
            });
        }

        let kept_by_left = self.left.retention_mask();
        let kept_by_right = self.right.retention_mask();

        let mut spans: Vec<SpanWithHistory> = Vec::with_capacity(self.origins.len());
        let push_removed = |spans: &mut Vec<SpanWithHistory>, range: Range<usize>| {
            for index in range {
                push_span(
                    spans,
                    characters[index].encode_utf8(&mut [0; 4]),
                    History::of_base_character(kept_by_left[index], kept_by_right[index]),
                );
            }
        };

        let mut next_unseen = 0;
        for origin in &self.origins {
            match origin {
                Origin::Retained { index, .. } => {
                    push_removed(&mut spans, next_unseen..*index);
                    push_span(
                        &mut spans,
                        characters[*index].encode_utf8(&mut [0; 4]),
                        History::Unchanged,
                    );

                    next_unseen = index + 1;
                }
                Origin::Inserted(runs) => {
                    for run in runs {
                        let gap_end = run.right_margin.min(old_len);
                        push_removed(&mut spans, next_unseen..gap_end);
                        next_unseen = next_unseen.max(gap_end);

                        let history = match run.sources.as_slice() {
                            [source] => History::added_from(source.side),
                            _ => History::AddedFromBoth,
                        };

                        push_span(&mut spans, &run.text, history);
                    }
                }
            }
        }

        push_removed(&mut spans, next_unseen..old_len);

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn insert(text: &str) -> Operation { Operation::Insert(text.to_owned()) }

    fn basil() -> Changeset {
        Changeset::new(
            8,
            5,
            vec![
                Operation::Retain(0),
                Operation::Retain(1),
                insert("si"),
                Operation::Retain(7),
            ],
        )
    }

    fn below() -> Changeset {
        Changeset::new(
            8,
            5,
            vec![
                Operation::Retain(0),
                insert("e"),
                Operation::Retain(6),
                insert("ow"),
            ],
        )
    }

    #[test]
    fn test_baseball() {
        let base = "baseball";
        assert_eq!(basil().apply(base).unwrap(), "basil");
        assert_eq!(below().apply(base).unwrap(), "below");

        let merged = basil().merge(&below()).unwrap();

        assert_eq!(merged.changeset().old_len(), 8);
        assert_eq!(merged.changeset().new_len(), 6);
        assert_eq!(merged.apply(base).unwrap(), "besiow");

        assert_eq!(merged.follow(Side::Left).apply("basil").unwrap(), "besiow");
        assert_eq!(merged.follow(Side::Right).apply("below").unwrap(), "besiow");

        assert_eq!(
            basil()
                .follow(merged.changeset())
                .unwrap()
                .apply("basil")
                .unwrap(),
            "besiow"
        );
        assert_eq!(
            below()
                .follow(merged.changeset())
                .unwrap()
                .apply("below")
                .unwrap(),
            "besiow"
        );
    }

    #[test]
    fn test_baseball_snapshot() {
        let merged = basil().merge(&below()).unwrap();

        insta::assert_debug_snapshot!(merged.changeset().operations(), @r"
        [
            <retain 0>,
            <insert 'esiow'>,
        ]
        ");
        insta::assert_debug_snapshot!(merged.follow(Side::Left).operations(), @r"
        [
            <keep 0>,
            <insert 'esiow'>,
        ]
        ");
    }

    #[test]
    fn test_merge_is_symmetric() {
        let merged = basil().merge(&below()).unwrap();
        let inverse = below().merge(&basil()).unwrap();

        assert_eq!(merged.changeset(), inverse.changeset());
    }

    #[test]
    fn test_merge_with_itself() {
        let changeset = Changeset::from_strings("hello world", "yellow words");
        let merged = changeset.merge(&changeset).unwrap();

        assert_eq!(merged.changeset(), &changeset);
        assert_eq!(
            merged.follow(Side::Left).operations(),
            &(0..changeset.operations().len())
                .map(FollowOperation::Keep)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_same_side_repeated_text_is_kept() {
        // The right side deletes the character between the two `x`-s.
        let left = Changeset::new(
            3,
            5,
            vec![
                Operation::Retain(0),
                insert("x"),
                Operation::Retain(1),
                insert("x"),
                Operation::Retain(2),
            ],
        );
        let right = Changeset::new(3, 2, vec![Operation::Retain(0), Operation::Retain(2)]);

        let merged = left.merge(&right).unwrap();

        assert_eq!(merged.apply("abc").unwrap(), "axxc");
    }

    #[test_case("ab", "a1b", "a2b", "a12b" ; "concurrent inserts are ordered by text")]
    #[test_case("ab", "aXb", "aXb", "aXb" ; "identical inserts appear once")]
    #[test_case("abc", "ac", "aXbc", "aXc" ; "deletion wins")]
    #[test_case("abcdef", "abdef", "abcde", "abde" ; "both delete")]
    #[test_case("cat", "bat", "cats", "bats" ; "replace and append")]
    #[test_case("", "left", "right", "leftright" ; "empty base")]
    fn test_merge(base: &str, left: &str, right: &str, expected: &str) {
        let left_changeset = Changeset::from_strings(base, left);
        let right_changeset = Changeset::from_strings(base, right);

        let merged = left_changeset.merge(&right_changeset).unwrap();
        assert_eq!(merged.apply(base).unwrap(), expected);

        let inverse = right_changeset.merge(&left_changeset).unwrap();
        assert_eq!(inverse.apply(base).unwrap(), expected);

        assert_eq!(merged.follow(Side::Left).apply(left).unwrap(), expected);
        assert_eq!(merged.follow(Side::Right).apply(right).unwrap(), expected);
    }

    #[test]
    fn test_base_mismatch() {
        let left = Changeset::from_strings("abc", "abd");
        let right = Changeset::from_strings("ab", "b");

        assert_eq!(
            left.merge(&right),
            Err(ChangesetError::BaseMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn test_invalid_input() {
        let left = Changeset::from_strings("abc", "abd");
        let right = Changeset::new(3, 1, vec![Operation::Retain(5)]);

        assert_eq!(
            left.merge(&right),
            Err(ChangesetError::IndexOutOfRange {
                position: 0,
                index: 5,
                limit: 3
            })
        );
    }

    #[test]
    fn test_unnormalized_inputs() {
        let left = Changeset::new(
            2,
            4,
            vec![Operation::Retain(0), insert("x"), insert("y"), Operation::Retain(1)],
        );
        let right = Changeset::from_strings("ab", "ab!");

        let merged = left.merge(&right).unwrap();

        assert_eq!(merged.apply("ab").unwrap(), "axyb!");
        assert_eq!(merged.follow(Side::Left).apply("axyb").unwrap(), "axyb!");
        assert_eq!(left.follow(merged.changeset()).unwrap().apply("axyb").unwrap(), "axyb!");
    }

    #[test]
    fn test_history() {
        let base = "baseball";
        let merged = basil().merge(&below()).unwrap();

        assert_eq!(
            merged.apply_with_history(base).unwrap(),
            vec![
                SpanWithHistory::new("b".to_owned(), History::Unchanged),
                SpanWithHistory::new("a".to_owned(), History::RemovedFromRight),
                SpanWithHistory::new("seba".to_owned(), History::RemovedFromBoth),
                SpanWithHistory::new("e".to_owned(), History::AddedFromRight),
                SpanWithHistory::new("l".to_owned(), History::RemovedFromLeft),
                SpanWithHistory::new("si".to_owned(), History::AddedFromLeft),
                SpanWithHistory::new("l".to_owned(), History::RemovedFromRight),
                SpanWithHistory::new("ow".to_owned(), History::AddedFromRight),
            ]
        );
    }

    #[test]
    fn test_history_of_shared_insertion() {
        let left = Changeset::from_strings("ab", "aXb");
        let merged = left.merge(&left).unwrap();

        assert_eq!(
            merged.apply_with_history("ab").unwrap(),
            vec![
                SpanWithHistory::new("a".to_owned(), History::Unchanged),
                SpanWithHistory::new("X".to_owned(), History::AddedFromBoth),
                SpanWithHistory::new("b".to_owned(), History::Unchanged),
            ]
        );
    }

    #[test]
    fn test_history_text_length_mismatch() {
        let merged = basil().merge(&below()).unwrap();

        assert_eq!(
            merged.apply_with_history("base"),
            Err(ChangesetError::TextLengthMismatch {
                expected: 8,
                actual: 4
            })
        );
    }
}
