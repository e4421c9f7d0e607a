pub mod document;
pub mod history;
pub mod span_with_history;
