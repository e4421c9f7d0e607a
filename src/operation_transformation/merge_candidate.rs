use crate::{
    Side,
    operation_transformation::{Changeset, Operation},
};

/// An operation of one of the merged changesets, identified by its side and
/// its position within that changeset's operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub side: Side,
    pub position: usize,
}

/// A run of inserted text and the input operation(s) it came from. A run has
/// two sources when both sides inserted the same text at the same place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedRun {
    pub text: String,
    pub sources: Vec<Source>,

    /// The base index retained right after the insertion on its side.
    pub right_margin: usize,
}

impl InsertedRun {
    pub fn position_on(&self, side: Side) -> Option<usize> {
        self.sources
            .iter()
            .find(|source| source.side == side)
            .map(|source| source.position)
    }
}

/// Where an operation of a merged changeset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A base character both sides kept, at the given positions of the left
    /// and right changesets.
    Retained {
        index: usize,
        left: usize,
        right: usize,
    },

    /// Adjacent runs inserted by either side, collapsed into one insert.
    Inserted(Vec<InsertedRun>),
}

impl Origin {
    pub fn operation(&self) -> Operation {
        match self {
            Origin::Retained { index, .. } => Operation::Retain(*index),
            Origin::Inserted(runs) => {
                Operation::Insert(runs.iter().map(|run| run.text.as_str()).collect())
            }
        }
    }
}

/// An entry of the candidate list the merged changeset is assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCandidate {
    /// The retained index, or the nearest retained index before an insertion
    /// (`None` when nothing is retained before it).
    pub anchor: Option<usize>,

    /// The nearest retained index after an insertion, `usize::MAX` when
    /// nothing is retained after it.
    pub right_margin: usize,

    pub origin: Origin,
}

impl MergeCandidate {
    pub fn retained(index: usize, left: usize, right: usize) -> Self {
        Self {
            anchor: Some(index),
            right_margin: index,
            origin: Origin::Retained { index, left, right },
        }
    }

    /// Collects the insertions of a (normalized) changeset together with the
    /// retained indices around them.
    pub fn insertions(changeset: &Changeset, side: Side) -> Vec<Self> {
        let operations = changeset.operations();
        let mut anchor = None;

        operations
            .iter()
            .enumerate()
            .filter_map(|(position, operation)| match operation {
                Operation::Retain(index) => {
                    anchor = Some(*index);
                    None
                }
                Operation::Insert(text) => {
                    let right_margin = operations
                        .get(position + 1)
                        .and_then(Operation::retained_index)
                        .unwrap_or(usize::MAX);

                    Some(Self {
                        anchor,
                        right_margin,
                        origin: Origin::Inserted(vec![InsertedRun {
                            text: text.clone(),
                            sources: vec![Source { side, position }],
                            right_margin,
                        }]),
                    })
                }
            })
            .collect()
    }

    /// Candidates are ordered by their anchor with retains before inserts.
    /// Inserts sharing an anchor always come from different sides, and are
    /// ordered by their right margin and then their text, so that the order is
    /// the same regardless of which changeset is left or right.
    pub fn get_sort_key(&self) -> (Option<usize>, u8, usize, &str) {
        match &self.origin {
            Origin::Retained { .. } => (self.anchor, 0, self.right_margin, ""),
            Origin::Inserted(runs) => (
                self.anchor,
                1,
                self.right_margin,
                runs.first().map_or("", |run| run.text.as_str()),
            ),
        }
    }

    /// Returns true if `self` repeats the `previous` candidate: the same
    /// retain, or the same text inserted by the other side.
    pub fn is_duplicate_of(&self, previous: &Self) -> bool {
        match (&self.origin, &previous.origin) {
            (
                Origin::Retained { index, .. },
                Origin::Retained {
                    index: previous_index,
                    ..
                },
            ) => index == previous_index,
            (Origin::Inserted(runs), Origin::Inserted(previous_runs)) => {
                match (runs.as_slice(), previous_runs.as_slice()) {
                    ([run], [previous_run]) => {
                        run.text == previous_run.text
                            && run.sources.iter().all(|source| {
                                previous_run.position_on(source.side).is_none()
                            })
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Records the sources of a duplicate on `self`.
    pub fn absorb(&mut self, duplicate: Self) {
        if let (Origin::Inserted(runs), Origin::Inserted(duplicate_runs)) =
            (&mut self.origin, duplicate.origin)
        {
            for (run, duplicate_run) in runs.iter_mut().zip(duplicate_runs) {
                run.sources.extend(duplicate_run.sources);
            }
        }
    }
}
