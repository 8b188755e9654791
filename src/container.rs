//! ZIP container abstraction for OOXML packages.

use crate::error::{Error, Result};
use crate::model::Metadata;
use quick_xml::events::Event;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Component, Path, PathBuf};

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
    /// Map from relationship type to list of relationships
    pub by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.by_type
            .get(rel_type)
            .map(|v| v.iter().collect())
            .unwrap_or_default()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }
}

/// Content types declared in `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Extension (lowercase, no dot) to content type
    pub defaults: HashMap<String, String>,
    /// Part name (lowercase, leading slash) to content type
    pub overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Look up the content type of a part. Overrides win over defaults.
    pub fn get(&self, part: &str) -> Option<&str> {
        let part_name = format!("/{}", part.trim_start_matches('/')).to_lowercase();
        if let Some(ct) = self.overrides.get(&part_name) {
            return Some(ct.as_str());
        }

        let ext = Path::new(&part_name)
            .extension()
            .and_then(|e| e.to_str())?;
        self.defaults.get(ext).map(String::as_str)
    }
}

/// Rewrite an XML declaration that claims UTF-16 once the content is UTF-8.
///
/// quick-xml honors the declared encoding, so a decoded string still
/// announcing UTF-16 would be misread.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 and UTF-16 (LE/BE).
///
/// Word writes UTF-8, but some producers emit UTF-16 parts, with or
/// without a byte order mark.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // ASCII markup in UTF-16 leaves every other byte zero
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                let content = decode_utf16(bytes, u16::from_le_bytes)?;
                Ok(fix_xml_encoding_declaration(&content))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                let content = decode_utf16(bytes, u16::from_be_bytes)?;
                Ok(fix_xml_encoding_declaration(&content))
            } else {
                Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "XML part is neither UTF-8 nor UTF-16",
                )))
            }
        }
    }
}

/// Absent entries become `MissingComponent`, other failures stay archive errors.
fn part_error(path: &str, err: zip::result::ZipError) -> Error {
    match err {
        zip::result::ZipError::FileNotFound => Error::MissingComponent(path.to_string()),
        other => Error::from(other),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// OOXML container abstraction over a ZIP archive.
///
/// Provides methods to read XML parts, relationships and content types
/// from an Office Open XML package.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    source: Option<PathBuf>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// A path that is not a regular file, or whose content is not a ZIP
    /// archive, is reported as [`Error::PackageNotFound`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docx_text::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("document.docx")?;
    /// # Ok::<(), docx_text::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::PackageNotFound(path.display().to_string()));
        }

        let data = fs::read(path)?;
        if !crate::detect::is_zip_file(&data) {
            return Err(Error::PackageNotFound(path.display().to_string()));
        }

        let mut container = Self::from_bytes(data)?;
        container.source = Some(path.to_path_buf());
        Ok(container)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
            source: None,
        })
    }

    /// Create an OOXML container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// The file this container was opened from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Read an XML part from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|e| part_error(path, e))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// Read package-level relationships (_rels/.rels).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.parse_relationships("_rels/.rels")
    }

    /// Parse `[Content_Types].xml`.
    pub fn read_content_types(&self) -> Result<ContentTypes> {
        let xml = self.read_xml("[Content_Types].xml")?;
        let mut types = ContentTypes::default();

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(value.to_lowercase()),
                            b"ContentType" => content_type = Some(value),
                            _ => {}
                        }
                    }

                    if let (Some(key), Some(ct)) = (key, content_type) {
                        match e.local_name().as_ref() {
                            b"Default" => {
                                types.defaults.insert(key.trim_start_matches('.').to_string(), ct);
                            }
                            b"Override" => {
                                types.overrides.insert(key, ct);
                            }
                            _ => {}
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Look up the content type of a single part.
    pub fn content_type_of(&self, part: &str) -> Result<Option<String>> {
        let types = self.read_content_types()?;
        Ok(types.get(part).map(String::from))
    }

    /// Parse core properties from docProps/core.xml.
    ///
    /// A missing or unreadable core part yields empty metadata.
    pub fn parse_core_metadata(&self) -> Result<Metadata> {
        let mut meta = Metadata::default();

        let xml = match self.read_xml("docProps/core.xml") {
            Ok(xml) => xml,
            Err(_) => return Ok(meta),
        };

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current_element: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    current_element =
                        Some(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                }
                Ok(Event::Text(e)) => {
                    if let Some(ref elem) = current_element {
                        let text = e.unescape().unwrap_or_default().to_string();
                        match elem.as_str() {
                            "title" => meta.title = Some(text),
                            "creator" => meta.author = Some(text),
                            "subject" => meta.subject = Some(text),
                            "description" => meta.description = Some(text),
                            "keywords" => {
                                meta.keywords = text
                                    .split([',', ';'])
                                    .map(|s| s.trim().to_string())
                                    .filter(|s| !s.is_empty())
                                    .collect();
                            }
                            "created" => meta.created = Some(text),
                            "modified" => meta.modified = Some(text),
                            "lastModifiedBy" => meta.last_modified_by = Some(text),
                            "revision" => meta.revision = text.parse().ok(),
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    current_element = None;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("Ignoring malformed docProps/core.xml: {}", e);
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(meta)
    }

    /// Parse a relationships part. A missing part is an empty collection.
    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let content = match self.read_xml(rels_path) {
            Ok(c) => c,
            Err(_) => return Ok(Relationships::new()),
        };

        if content.trim().is_empty() {
            return Ok(Relationships::new());
        }

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"Relationship" => {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            b"TargetMode" => {
                                external = String::from_utf8_lossy(&attr.value)
                                    .eq_ignore_ascii_case("external")
                            }
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Resolve a relationship target against the part that declares it.
    ///
    /// An empty `base` resolves against the package root.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir => {
                    result.pop();
                }
                Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("source", &self.source)
            .field("files", &self.list_files().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{build_package, CONTENT_TYPES, PACKAGE_RELS};

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("", "word/document.xml"),
            "word/document.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("", "/word/document.xml"),
            "word/document.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "../media/image1.png"),
            "media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "styles.xml"),
            "word/styles.xml"
        );
    }

    #[test]
    fn test_relationships_collection() {
        let mut rels = Relationships::new();
        rels.add(Relationship {
            id: "rId1".to_string(),
            rel_type: "http://test/type1".to_string(),
            target: "target1.xml".to_string(),
            external: false,
        });
        rels.add(Relationship {
            id: "rId2".to_string(),
            rel_type: "http://test/type1".to_string(),
            target: "target2.xml".to_string(),
            external: false,
        });

        assert!(rels.get("rId1").is_some());
        assert!(rels.get("rId3").is_none());
        assert_eq!(rels.get_by_type("http://test/type1").len(), 2);
    }

    #[test]
    fn test_package_parts() {
        let data = build_package(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", PACKAGE_RELS),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        assert!(container.exists("[Content_Types].xml"));
        assert!(!container.exists("word/document.xml"));
        assert_eq!(container.list_files().len(), 2);
        assert!(container.source().is_none());

        let rels = container.read_package_relationships().unwrap();
        let rel = rels.get("rId1").unwrap();
        assert_eq!(rel.target, "word/document.xml");
        assert!(!rel.external);

        assert!(matches!(
            container.read_xml("word/document.xml"),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_content_types_lookup() {
        let data = build_package(&[("[Content_Types].xml", CONTENT_TYPES)]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        assert_eq!(
            container.content_type_of("word/document.xml").unwrap().as_deref(),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml")
        );
        // Falls back to the Default for the extension
        assert_eq!(
            container.content_type_of("word/styles.xml").unwrap().as_deref(),
            Some("application/xml")
        );
        assert_eq!(container.content_type_of("media/a.bin").unwrap(), None);
    }

    #[test]
    fn test_core_metadata() {
        let core = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/">
  <dc:title>Quarterly Notes</dc:title>
  <dc:creator>Jane Doe</dc:creator>
  <cp:keywords>alpha; beta, gamma</cp:keywords>
  <cp:lastModifiedBy>John Roe</cp:lastModifiedBy>
  <cp:revision>3</cp:revision>
</cp:coreProperties>"#;
        let data = build_package(&[("docProps/core.xml", core)]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        let meta = container.parse_core_metadata().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Quarterly Notes"));
        assert_eq!(meta.author.as_deref(), Some("Jane Doe"));
        assert_eq!(meta.keywords, vec!["alpha", "beta", "gamma"]);
        assert_eq!(meta.last_modified_by.as_deref(), Some("John Roe"));
        assert_eq!(meta.revision, Some(3));
    }

    #[test]
    fn test_missing_core_metadata_is_empty() {
        let data = build_package(&[("[Content_Types].xml", CONTENT_TYPES)]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let meta = container.parse_core_metadata().unwrap();
        assert!(meta.title.is_none());
        assert!(meta.keywords.is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let result = OoxmlContainer::open("does/not/exist.docx");
        assert!(matches!(result, Err(Error::PackageNotFound(_))));
    }

    #[test]
    fn test_open_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = OoxmlContainer::open(dir.path());
        assert!(matches!(result, Err(Error::PackageNotFound(_))));
    }

    #[test]
    fn test_open_non_zip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, "plain text, not a package").unwrap();

        let result = OoxmlContainer::open(&path);
        assert!(matches!(result, Err(Error::PackageNotFound(_))));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        let utf8_plain = b"<?xml>";
        assert_eq!(decode_xml_bytes(utf8_plain).unwrap(), "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert_eq!(decoded, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
    }

    #[test]
    fn test_invalid_utf8_part_is_error() {
        let err = decode_xml_bytes(b"<a>\xC3\x28</a>").unwrap_err();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected invalid data, got {other:?}"),
        }

        let data = build_package(&[("word/document.xml", "<a>\u{FFFD}</a>")]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(container.read_xml("word/document.xml").is_ok());
    }

    #[test]
    fn test_part_error_mapping() {
        assert!(matches!(
            part_error("word/document.xml", zip::result::ZipError::FileNotFound),
            Error::MissingComponent(ref p) if p == "word/document.xml"
        ));
        assert!(matches!(
            part_error(
                "word/document.xml",
                zip::result::ZipError::UnsupportedArchive("Compression method not supported")
            ),
            Error::ZipArchive(_)
        ));
    }
}
