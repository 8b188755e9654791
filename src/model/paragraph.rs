//! Paragraph model.

use serde::{Deserialize, Serialize};

/// A block-level paragraph of the document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Concatenated run text, empty for a blank paragraph
    pub text: String,

    /// Paragraph style ID reference (`w:pStyle`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style_id: None,
        }
    }

    /// Set the paragraph style ID.
    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    /// Append text to this paragraph.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Check if this paragraph has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
