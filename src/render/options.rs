//! Text rendering options.

/// Options for rendering a document as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// Separator placed between paragraphs
    pub separator: String,

    /// Apply Unicode NFC normalization to the output
    pub normalize_unicode: bool,

    /// Drop paragraphs with no text
    pub skip_empty: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            separator: "\n".to_string(),
            normalize_unicode: false,
            skip_empty: false,
        }
    }
}

impl TextOptions {
    /// Create new text options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paragraph separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_normalize_unicode(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Enable or disable dropping of empty paragraphs.
    pub fn with_skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = TextOptions::default();
        assert_eq!(opts.separator, "\n");
        assert!(!opts.normalize_unicode);
        assert!(!opts.skip_empty);
    }

    #[test]
    fn test_builder_pattern() {
        let opts = TextOptions::new()
            .with_separator("\n\n")
            .with_normalize_unicode(true)
            .with_skip_empty(true);

        assert_eq!(opts.separator, "\n\n");
        assert!(opts.normalize_unicode);
        assert!(opts.skip_empty);
    }
}
