//! Longest common subsequence through the classic `O(m·n)` dynamic program.
//!
//! The alignment returned here is a contract rather than an implementation
//! detail: every collaborator has to derive the same changeset from the same
//! pair of texts, so the backtracking rule is fixed. Whenever stepping back in
//! the old text and stepping back in the new text would keep the same LCS
//! length, the old text is stepped back first.

use crate::utils::common_suffix_len::common_suffix_len;

/// Returns the `(old_index, new_index)` pairs of a longest common subsequence
/// of `old` and `new`. Both coordinates are strictly increasing.
///
/// ```
/// use converge_text::longest_common_subsequence;
///
/// let old: Vec<char> = "baseball".chars().collect();
/// let new: Vec<char> = "ball".chars().collect();
///
/// assert_eq!(
///     longest_common_subsequence(&old, &new),
///     vec![(4, 0), (5, 1), (6, 2), (7, 3)]
/// );
/// ```
#[must_use]
pub fn longest_common_subsequence<T>(old: &[T], new: &[T]) -> Vec<(usize, usize)>
where
    T: PartialEq,
{
    if old.is_empty() || new.is_empty() {
        return Vec::new();
    }

    // Backtracking always takes a match when the trailing items are equal, so
    // a common suffix can be aligned upfront without changing the result.
    let suffix_length = common_suffix_len(old, new);
    let old_end = old.len() - suffix_length;
    let new_end = new.len() - suffix_length;

    let table = LengthTable::new(&old[..old_end], &new[..new_end]);

    let mut alignment = Vec::with_capacity(table.get(old_end, new_end) + suffix_length);
    let (mut i, mut j) = (old_end, new_end);
    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            alignment.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if table.get(i - 1, j) >= table.get(i, j - 1) {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    alignment.reverse();
    alignment.extend((0..suffix_length).map(|offset| (old_end + offset, new_end + offset)));

    debug_assert!(
        alignment
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0 && pair[0].1 < pair[1].1),
        "LCS alignment must be strictly increasing in both coordinates"
    );

    alignment
}

/// `(m + 1) × (n + 1)` table of LCS lengths of every pair of prefixes, stored
/// row-major.
struct LengthTable {
    width: usize,
    cells: Vec<usize>,
}

impl LengthTable {
    fn new<T>(old: &[T], new: &[T]) -> Self
    where
        T: PartialEq,
    {
        let width = new.len() + 1;
        let mut cells = vec![0; (old.len() + 1) * width];

        for (i, old_item) in old.iter().enumerate() {
            let row = (i + 1) * width;
            let previous_row = i * width;

            for (j, new_item) in new.iter().enumerate() {
                cells[row + j + 1] = if old_item == new_item {
                    cells[previous_row + j] + 1
                } else {
                    cells[previous_row + j + 1].max(cells[row + j])
                };
            }
        }

        Self { width, cells }
    }

    fn get(&self, old_prefix: usize, new_prefix: usize) -> usize {
        self.cells[old_prefix * self.width + new_prefix]
    }
}
