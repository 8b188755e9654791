//! Plain text renderer implementation.

use crate::error::Result;
use crate::model::Document;
use unicode_normalization::UnicodeNormalization;

use super::options::TextOptions;

/// Convert a Document to plain text.
///
/// With default options this is the paragraph texts joined by `\n`,
/// blank paragraphs included, in document order.
pub fn to_text(doc: &Document, options: &TextOptions) -> Result<String> {
    let text = doc
        .paragraphs
        .iter()
        .filter(|para| !(options.skip_empty && para.is_empty()))
        .map(|para| para.plain_text())
        .collect::<Vec<_>>()
        .join(options.separator.as_str());

    if options.normalize_unicode {
        Ok(text.nfc().collect())
    } else {
        Ok(text)
    }
}
