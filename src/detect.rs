//! Package inspection: ZIP sniffing and main document part discovery.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Relationship type of the package's main part (transitional schema).
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Relationship type of the package's main part (strict schema).
const OFFICE_DOCUMENT_REL_STRICT: &str =
    "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";

/// Main part used by packages that carry no package relationships.
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Content types accepted for the main part of a Word package.
const WORD_CONTENT_TYPES: [&str; 4] = [
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml",
    "application/vnd.ms-word.document.macroEnabled.main+xml",
    "application/vnd.ms-word.template.macroEnabledTemplate.main+xml",
];

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Check if a content type names a WordprocessingML main part.
pub fn is_word_content_type(content_type: &str) -> bool {
    WORD_CONTENT_TYPES
        .iter()
        .any(|ct| ct.eq_ignore_ascii_case(content_type))
}

/// Locate the main document part of a Word package.
///
/// The part is the target of the package's `officeDocument` relationship.
/// Packages without one fall back to `word/document.xml`. The part's
/// declared content type must be a Word document or template.
///
/// # Example
///
/// ```no_run
/// use docx_text::container::OoxmlContainer;
/// use docx_text::detect::main_document_part;
///
/// let container = OoxmlContainer::open("document.docx")?;
/// let part = main_document_part(&container)?;
/// assert_eq!(part, "word/document.xml");
/// # Ok::<(), docx_text::Error>(())
/// ```
pub fn main_document_part(container: &OoxmlContainer) -> Result<String> {
    let rels = container.read_package_relationships()?;

    let target = rels
        .get_by_type(OFFICE_DOCUMENT_REL)
        .into_iter()
        .chain(rels.get_by_type(OFFICE_DOCUMENT_REL_STRICT))
        .find(|rel| !rel.external)
        .map(|rel| OoxmlContainer::resolve_path("", &rel.target));

    let part = match target {
        Some(part) => part,
        None if container.exists(DEFAULT_MAIN_PART) => {
            log::warn!(
                "No officeDocument relationship, falling back to {}",
                DEFAULT_MAIN_PART
            );
            DEFAULT_MAIN_PART.to_string()
        }
        None => return Err(Error::MissingComponent("main document part".to_string())),
    };

    if !container.exists(&part) {
        return Err(Error::MissingComponent(part));
    }

    let content_type = container
        .content_type_of(&part)?
        .ok_or_else(|| Error::MissingComponent(format!("content type for {}", part)))?;
    if !is_word_content_type(&content_type) {
        return Err(Error::NotWordDocument(content_type));
    }

    log::debug!("Main document part: {} ({})", part, content_type);
    Ok(part)
}
