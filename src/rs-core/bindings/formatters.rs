use serde::Serialize;

use crate::{
    models::HistoryEntry,
    session::{CatalogResult, SessionView},
    Logger,
};

/// Serialize `value` as JSON for the JavaScript-side.
///
/// Returns `None`, after logging the issue, if `value` cannot be serialized.
fn format_json_for_js<T: Serialize + ?Sized>(value: &T, name: &str) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(serialized) => Some(serialized),
        Err(err) => {
            Logger::error(&format!("Bindings: Could not serialize {name}: {err}"));
            None
        }
    }
}

pub(crate) fn format_view_for_js(view: &SessionView) -> Option<String> {
    format_json_for_js(view, "view")
}

pub(crate) fn format_history_for_js(history: &[HistoryEntry]) -> String {
    format_json_for_js(history, "history").unwrap_or_else(|| "[]".to_owned())
}

/// Returns the result of a catalog request as either its JSON value or the error message.
pub(crate) fn format_catalog_result_for_js(result: &CatalogResult) -> Result<String, String> {
    match &result.result {
        Ok(value) => Ok(value.to_string()),
        Err(err) => Err(err.to_string()),
    }
}
