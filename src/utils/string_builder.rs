use std::str::Chars;

/// A helper for building a string in-order from an original string by copying
/// some of its characters and inserting new text in between. It is safe to
/// use with UTF-8 strings as all indices are character indices. Retained
/// indices must be increasing.
pub struct StringBuilder<'a> {
    original: Chars<'a>,
    position: usize,
    buffer: String,
}

impl<'a> StringBuilder<'a> {
    pub fn new(original: &'a str) -> Self {
        StringBuilder {
            original: original.chars(),
            position: 0,
            buffer: String::with_capacity(original.len()),
        }
    }

    /// Insert a string at the end of the built buffer.
    pub fn insert(&mut self, text: &str) { self.buffer.push_str(text); }

    /// Copy the character at `index` of the original string to the built
    /// buffer, skipping every character between the previously retained one
    /// and `index`.
    pub fn retain(&mut self, index: usize) {
        debug_assert!(
            index >= self.position,
            "Retained index {index} is behind the current position {}",
            self.position
        );

        if let Some(character) = self.original.nth(index - self.position) {
            self.buffer.push(character);
        }

        self.position = index + 1;
    }

    /// Returns the currently built buffer and clears it.
    pub fn take(&mut self) -> String { std::mem::take(&mut self.buffer) }
}

impl std::fmt::Debug for StringBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringBuilder")
            .field("position", &self.position)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}
