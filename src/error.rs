//! Error types for the docx-text library.

use std::io;
use thiserror::Error;

/// Result type alias for docx-text operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The path does not point at a readable OOXML package.
    #[error("Package not found at '{0}'")]
    PackageNotFound(String),

    /// The package is valid but its main part is not a Word document.
    #[error("not a Word document, content type is '{0}'")]
    NotWordDocument(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
