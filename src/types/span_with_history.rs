#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::history::History;

/// Wrapper type for `(String, History)` where History describes the origin of
/// `text`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanWithHistory {
    text: String,
    history: History,
}

impl SpanWithHistory {
    #[must_use]
    pub fn new(text: String, history: History) -> Self { SpanWithHistory { text, history } }

    #[must_use]
    pub fn history(&self) -> History { self.history }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }
}

/// Appends `text` to the last span when it has the same history, otherwise
/// starts a new span.
pub(crate) fn push_span(spans: &mut Vec<SpanWithHistory>, text: &str, history: History) {
    if text.is_empty() {
        return;
    }

    if let Some(last) = spans.last_mut() {
        if last.history == history {
            last.text.push_str(text);
            return;
        }
    }

    spans.push(SpanWithHistory::new(text.to_owned(), history));
}
