//! # docx-text
//!
//! Paragraph text extraction from Microsoft Word (.docx) documents.
//!
//! The body paragraphs of a document are read in order and joined with
//! newlines. Blank paragraphs are kept, so the output preserves the
//! document's blank lines.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Paragraph text joined by newlines
//! let text = docx_text::read_docx("document.docx")?;
//! println!("{}", text);
//!
//! // Full parsing with access to paragraphs and metadata
//! let doc = docx_text::parse_file("document.docx")?;
//! println!("Paragraphs: {}", doc.paragraphs.len());
//! println!("Title: {:?}", doc.metadata.title);
//! # Ok::<(), docx_text::Error>(())
//! ```
//!
//! ## Rendering
//!
//! ```no_run
//! use docx_text::render::{to_json, to_text, JsonFormat, TextOptions};
//!
//! let doc = docx_text::parse_file("document.docx")?;
//! let text = to_text(&doc, &TextOptions::new().with_skip_empty(true))?;
//! let json = to_json(&doc, JsonFormat::Compact)?;
//! # Ok::<(), docx_text::Error>(())
//! ```

pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod model;
pub mod render;

#[cfg(test)]
mod test_util;

// Re-exports
pub use container::{ContentTypes, OoxmlContainer, Relationship, Relationships};
pub use docx::DocxParser;
pub use error::{Error, Result};
pub use model::{Document, Metadata, Paragraph};
pub use render::{JsonFormat, TextOptions};

use std::path::Path;

/// Parse a Word document file and return a Document model.
///
/// # Example
///
/// ```no_run
/// use docx_text::parse_file;
///
/// let doc = parse_file("document.docx")?;
/// println!("Paragraphs: {}", doc.paragraphs.len());
/// # Ok::<(), docx_text::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    log::debug!("Opening {}", path.display());
    let mut parser = DocxParser::open(path)?;
    parser.parse()
}

/// Parse a Word document from bytes.
///
/// # Example
///
/// ```no_run
/// use docx_text::parse_bytes;
///
/// let data = std::fs::read("document.docx")?;
/// let doc = parse_bytes(&data)?;
/// # Ok::<(), docx_text::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let mut parser = DocxParser::from_bytes(data.to_vec())?;
    parser.parse()
}

/// Read the paragraph text of a Word document.
///
/// Paragraph texts are joined by `\n` in document order. Empty paragraphs
/// contribute empty lines, and a document without paragraphs yields an
/// empty string.
///
/// # Example
///
/// ```no_run
/// let text = docx_text::read_docx("document.docx")?;
/// println!("{}", text);
/// # Ok::<(), docx_text::Error>(())
/// ```
pub fn read_docx(path: impl AsRef<Path>) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, &TextOptions::default())
}

/// Read the paragraph text of an in-memory Word document.
pub fn read_docx_bytes(data: &[u8]) -> Result<String> {
    let doc = parse_bytes(data)?;
    render::to_text(&doc, &TextOptions::default())
}

/// Read the paragraph text of a Word document from any seekable reader.
pub fn read_docx_from_reader<R: std::io::Read + std::io::Seek>(reader: R) -> Result<String> {
    let container = OoxmlContainer::from_reader(reader)?;
    let mut parser = DocxParser::from_container(container)?;
    let doc = parser.parse()?;
    render::to_text(&doc, &TextOptions::default())
}
