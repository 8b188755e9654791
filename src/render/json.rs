//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a Document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(doc),
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
    };
    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
