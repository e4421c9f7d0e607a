use core::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::operation_transformation::{Changeset, ChangesetError, Follow};

/// The text of a collaboratively edited document, as seen by one participant.
///
/// Local edits are turned into changesets with [`Document::update`], while
/// changes of others arrive as changesets or follow mappings to apply. A
/// failed application leaves the document untouched.
///
/// ```
/// use converge_text::Document;
///
/// let mut document = Document::new("hello world");
/// let changeset = document.update("hello brave world").unwrap();
///
/// let mut replica = Document::new("hello world");
/// replica.apply(&changeset).unwrap();
///
/// assert_eq!(replica, document);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    text: String,
}

impl Document {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self { Self { text: text.into() } }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    /// Length of the document in characters.
    #[must_use]
    pub fn len(&self) -> usize { self.text.chars().count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    /// Replace the content with `new_text` and return the changeset leading
    /// from the previous content to it, or `None` if nothing changed.
    pub fn update(&mut self, new_text: impl Into<String>) -> Option<Changeset> {
        let new_text = new_text.into();
        if new_text == self.text {
            return None;
        }

        let changeset = Changeset::from_strings(&self.text, &new_text);
        tracing::debug!(
            old_len = changeset.old_len(),
            new_len = changeset.new_len(),
            operations = changeset.operations().len(),
            "local edit"
        );

        self.text = new_text;

        Some(changeset)
    }

    /// Apply a changeset built against the current content.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Changeset::apply`].
    pub fn apply(&mut self, changeset: &Changeset) -> Result<(), ChangesetError> {
        self.text = changeset
            .apply(&self.text)
            .inspect_err(|error| tracing::warn!(%error, "failed to apply changeset"))?;

        Ok(())
    }

    /// Rebase the content onto a merge it took part in.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Follow::apply`].
    pub fn apply_follow(&mut self, follow: Follow) -> Result<(), ChangesetError> {
        self.text = follow
            .apply(&self.text)
            .inspect_err(|error| tracing::warn!(%error, "failed to apply follow"))?;

        Ok(())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self { Document::new(text) }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self { Document::new(text) }
}

impl From<Document> for String {
    fn from(document: Document) -> Self { document.text }
}
