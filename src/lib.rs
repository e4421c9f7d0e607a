mod operation_transformation;
mod types;
mod utils;

pub use operation_transformation::{
    Changeset, ChangesetError, Follow, FollowOperation, MergedChangeset, Operation, reconcile,
};
pub use types::{document::Document, history::History, span_with_history::SpanWithHistory};
pub use utils::{lcs::longest_common_subsequence, side::Side};

#[cfg(feature = "wasm")]
pub mod wasm;
