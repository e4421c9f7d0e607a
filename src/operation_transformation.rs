mod changeset;
mod changeset_error;
mod follow;
mod merge_candidate;
mod merged_changeset;
mod operation;

mod utils {
    pub mod collapse_inserts;
}

pub use changeset::Changeset;
pub use changeset_error::ChangesetError;
pub use follow::{Follow, FollowOperation};
pub use merged_changeset::MergedChangeset;
pub use operation::Operation;

/// Given an `original` text and two concurrent edits of it, return a text
/// containing the changes of both `left` and `right`.
///
/// Every character inserted by either side is present in the result, and a
/// character of `original` is only kept if neither side deleted it. When both
/// sides insert the same text at the same place, it appears once.
///
/// The texts are compared character by character and the function supports
/// UTF-8.
///
/// ```
/// use converge_text::reconcile;
///
/// let original = "Merging text is hard!";
/// let left = "Merging text is easy!";
/// let right = "Merging texts is hard!!";
///
/// assert_eq!(
///     reconcile(original, left, right).unwrap(),
///     "Merging texts is easy!!"
/// );
/// ```
///
/// # Errors
///
/// Changesets built from strings are always valid, so this only fails if one
/// of the internal invariants is broken.
pub fn reconcile(original: &str, left: &str, right: &str) -> Result<String, ChangesetError> {
    let left_changeset = Changeset::from_strings(original, left);
    let right_changeset = Changeset::from_strings(original, right);

    left_changeset.merge(&right_changeset)?.apply(original)
}
