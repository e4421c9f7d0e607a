//! Expose the crate's functionality to WebAssembly. Changesets and follow
//! mappings cross the boundary as JSON strings.
use wasm_bindgen::prelude::*;

use crate::{Changeset, Follow, SpanWithHistory};

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc<'_> = wee_alloc::WeeAlloc::INIT;

/// WASM wrapper around `Changeset::from_strings`.
///
/// # Errors
///
/// If serialization to JSON fails which should not happen
#[wasm_bindgen(js_name = computeChangeset)]
pub fn compute_changeset(old: &str, new: &str) -> Result<String, JsError> {
    set_panic_hook();

    Ok(serde_json::to_string(&Changeset::from_strings(old, new))?)
}

/// WASM wrapper around `Changeset::apply`.
///
/// # Errors
///
/// If the changeset isn't valid JSON or can't be applied to `text`.
#[wasm_bindgen(js_name = applyChangeset)]
pub fn apply_changeset(changeset: &str, text: &str) -> Result<String, JsError> {
    set_panic_hook();
    let changeset: Changeset = serde_json::from_str(changeset)?;

    Ok(changeset.apply(text)?)
}

/// WASM wrapper around `Changeset::merge` returning the merged changeset.
///
/// # Errors
///
/// If either changeset isn't valid JSON or they can't be merged.
#[wasm_bindgen(js_name = mergeChangesets)]
pub fn merge_changesets(left: &str, right: &str) -> Result<String, JsError> {
    set_panic_hook();
    let left: Changeset = serde_json::from_str(left)?;
    let right: Changeset = serde_json::from_str(right)?;

    let merged = left.merge(&right)?.into_changeset();

    Ok(serde_json::to_string(&merged)?)
}

/// WASM wrapper around `Changeset::follow`.
///
/// # Errors
///
/// If either changeset isn't valid JSON or `merged` wasn't merged from
/// `source`.
#[wasm_bindgen(js_name = computeFollow)]
pub fn compute_follow(source: &str, merged: &str) -> Result<String, JsError> {
    set_panic_hook();
    let source: Changeset = serde_json::from_str(source)?;
    let merged: Changeset = serde_json::from_str(merged)?;

    Ok(serde_json::to_string(&source.follow(&merged)?)?)
}

/// WASM wrapper around `Follow::apply`.
///
/// # Errors
///
/// If the follow mapping isn't valid JSON or can't be applied to `document`.
#[wasm_bindgen(js_name = applyFollow)]
pub fn apply_follow(follow: &str, document: &str) -> Result<String, JsError> {
    set_panic_hook();
    let follow: Follow = serde_json::from_str(follow)?;

    Ok(follow.apply(document)?)
}

/// WASM wrapper around `crate::reconcile` for merging text.
///
/// # Errors
///
/// Only if an internal invariant is broken.
#[wasm_bindgen(js_name = reconcile)]
pub fn reconcile(original: &str, left: &str, right: &str) -> Result<String, JsError> {
    set_panic_hook();

    Ok(crate::reconcile(original, left, right)?)
}

/// Like `reconcile` but returns the merged text as a JSON list of spans, each
/// with the history of where it came from.
///
/// # Errors
///
/// Only if an internal invariant is broken.
#[wasm_bindgen(js_name = reconcileWithHistory)]
pub fn reconcile_with_history(original: &str, left: &str, right: &str) -> Result<String, JsError> {
    set_panic_hook();
    let left = Changeset::from_strings(original, left);
    let right = Changeset::from_strings(original, right);

    let history: Vec<SpanWithHistory> = left.merge(&right)?.apply_with_history(original)?;

    Ok(serde_json::to_string(&history)?)
}

fn set_panic_hook() {
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
