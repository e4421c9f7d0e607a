use thiserror::Error;

/// Error type for malformed changesets and for changesets applied to or merged
/// with something they were not built against.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangesetError {
    /// Replaying the operations does not produce the declared new length
    #[error(
        "Invalid changeset: the operations produce {actual} characters but the changeset \
         declares a new length of {expected}"
    )]
    LengthMismatch {
        /// The declared length
        expected: usize,
        /// The length the operations actually produce
        actual: usize,
    },

    /// A retain (or a follow reference) points outside of the allowed range or
    /// is not after the previously retained index
    #[error(
        "Invalid changeset: operation {position} references index {index}, which is either \
         not below {limit} or not after the previously referenced index"
    )]
    IndexOutOfRange {
        /// The position of the offending operation
        position: usize,
        /// The referenced index
        index: usize,
        /// The exclusive upper bound of valid indices
        limit: usize,
    },

    /// Two changesets to be merged were built against texts of different
    /// lengths
    #[error(
        "Cannot combine changesets built against different base texts (of length {left} and \
         {right})"
    )]
    BaseMismatch {
        /// The base length of the left changeset
        left: usize,
        /// The base length of the right changeset
        right: usize,
    },

    /// The text given to apply a changeset to is not the text it was built
    /// against
    #[error(
        "The text has {actual} characters but the changeset was built against a text of \
         {expected} characters"
    )]
    TextLengthMismatch {
        /// The length the changeset expects
        expected: usize,
        /// The length of the given text
        actual: usize,
    },

    /// An insert operation carries no text
    #[error("Invalid changeset: operation {position} inserts an empty string")]
    EmptyInsert {
        /// The position of the offending operation
        position: usize,
    },

    /// The merged changeset keeps a base character that the changeset being
    /// followed has dropped, so the merge wasn't derived from it
    #[error(
        "Cannot follow: the merged changeset retains index {index} which the source changeset \
         does not"
    )]
    UnknownRetain {
        /// The retained index of the base text
        index: usize,
    },
}
