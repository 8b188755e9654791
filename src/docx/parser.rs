//! DOCX parser implementation.

use crate::container::OoxmlContainer;
use crate::detect::main_document_part;
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Paragraph};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::NsReader;

/// Parser for DOCX (Word) documents.
pub struct DocxParser {
    container: OoxmlContainer,
    main_part: String,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from an opened container.
    pub fn from_container(container: OoxmlContainer) -> Result<Self> {
        let main_part = main_document_part(&container)?;
        Ok(Self {
            container,
            main_part,
        })
    }

    /// Parse the document and return a Document model.
    pub fn parse(&mut self) -> Result<Document> {
        let metadata = self.parse_metadata()?;
        let paragraphs = self.paragraphs()?;
        Ok(Document {
            metadata,
            paragraphs,
        })
    }

    /// Read the body paragraphs of the main document part, in order.
    pub fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        let xml = self.container.read_xml(&self.main_part)?;
        let paragraphs = parse_body_paragraphs(&xml)?;
        log::debug!(
            "Read {} paragraphs from {}",
            paragraphs.len(),
            self.main_part
        );
        Ok(paragraphs)
    }

    fn parse_metadata(&self) -> Result<Metadata> {
        self.container.parse_core_metadata()
    }

    /// Path of the main document part inside the package.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }
}

/// WordprocessingML namespaces, transitional and strict.
const WORDML_NAMESPACES: [&[u8]; 2] = [
    b"http://schemas.openxmlformats.org/wordprocessingml/2006/main",
    b"http://purl.oclc.org/ooxml/wordprocessingml/main",
];

/// Local name of an open element, `None` outside the WordprocessingML namespace.
type ElementName = Option<Vec<u8>>;

/// Extract the paragraphs that are direct children of `w:body`.
///
/// Elements are matched by namespace, so any prefix bound to the
/// WordprocessingML namespace works (`w:`, `ns0:`, or a default `xmlns`).
/// Paragraph text is gathered from runs directly under the paragraph or
/// under a direct `w:hyperlink` child. Paragraphs inside tables, content
/// controls and text boxes are skipped, as are runs inside revision marks
/// (`w:ins`, `w:del`) and field results.
pub fn parse_body_paragraphs(xml: &str) -> Result<Vec<Paragraph>> {
    let mut reader = NsReader::from_str(xml);
    // Keep whitespace inside w:t
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut buf = Vec::new();
    let mut stack: Vec<ElementName> = Vec::new();

    let mut current: Option<Paragraph> = None;
    let mut para_depth = 0usize;
    let mut run_depth: Option<usize> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let depth = stack.len();
                let name = word_name(&reader, e.name());
                match name.as_deref() {
                    Some(b"p") if current.is_none() && is_body(&stack) => {
                        current = Some(Paragraph::new());
                        para_depth = depth;
                    }
                    Some(b"r") if current.is_some() && is_run_parent(&stack, para_depth) => {
                        run_depth = Some(depth);
                    }
                    Some(b"t") if is_run_child(run_depth, depth) => in_text = true,
                    Some(local) => {
                        if let Some(para) = current.as_mut() {
                            if is_run_child(run_depth, depth) {
                                if let Some(text) = run_marker_text(&reader, local, e) {
                                    para.push_str(text);
                                }
                            }
                        }
                    }
                    None => {}
                }
                stack.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let depth = stack.len();
                match word_name(&reader, e.name()).as_deref() {
                    Some(b"p") if current.is_none() && is_body(&stack) => {
                        paragraphs.push(Paragraph::new());
                    }
                    Some(b"pStyle")
                        if current.is_some() && is_paragraph_property(&stack, para_depth) =>
                    {
                        if let Some(para) = current.as_mut() {
                            para.style_id = attr_value(&reader, e, b"val");
                        }
                    }
                    Some(local) => {
                        if let Some(para) = current.as_mut() {
                            if is_run_child(run_depth, depth) {
                                if let Some(text) = run_marker_text(&reader, local, e) {
                                    para.push_str(text);
                                }
                            }
                        }
                    }
                    None => {}
                }
            }
            Ok(Event::Text(ref e)) if in_text => {
                if let Some(para) = current.as_mut() {
                    let text = e.unescape()?;
                    para.push_str(&text);
                }
            }
            Ok(Event::CData(ref e)) if in_text => {
                if let Some(para) = current.as_mut() {
                    para.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::End(_)) => {
                let closed = stack.pop().flatten();
                let depth = stack.len();

                if matches!(closed.as_deref(), Some(b"t")) {
                    in_text = false;
                }
                if run_depth == Some(depth) {
                    run_depth = None;
                }
                if current.is_some() && depth == para_depth {
                    if let Some(para) = current.take() {
                        paragraphs.push(para);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlParse(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn is_wordml(ns: &ResolveResult) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => WORDML_NAMESPACES.iter().any(|known| known == uri),
        _ => false,
    }
}

/// Local name of a WordprocessingML element, `None` for any other namespace.
fn word_name(reader: &NsReader<&[u8]>, name: QName) -> ElementName {
    let (ns, local) = reader.resolve_element(name);
    is_wordml(&ns).then(|| local.as_ref().to_vec())
}

fn is_named(name: Option<&ElementName>, local: &[u8]) -> bool {
    matches!(name, Some(Some(n)) if n.as_slice() == local)
}

/// The innermost open element is `w:body`.
fn is_body(stack: &[ElementName]) -> bool {
    is_named(stack.last(), b"body")
}

/// A run opened here belongs to the paragraph at `para_depth`.
fn is_run_parent(stack: &[ElementName], para_depth: usize) -> bool {
    match stack.len() - para_depth {
        1 => true,
        2 => is_named(stack.last(), b"hyperlink"),
        _ => false,
    }
}

/// An element opened at `depth` is a direct child of the current run.
fn is_run_child(run_depth: Option<usize>, depth: usize) -> bool {
    run_depth.map_or(false, |d| d + 1 == depth)
}

/// An element opened here sits directly in the paragraph's `w:pPr`.
fn is_paragraph_property(stack: &[ElementName], para_depth: usize) -> bool {
    stack.len() == para_depth + 2 && is_named(stack.last(), b"pPr")
}

/// Text contributed by a non-`w:t` run child.
fn run_marker_text(
    reader: &NsReader<&[u8]>,
    local: &[u8],
    e: &BytesStart,
) -> Option<&'static str> {
    match local {
        b"tab" | b"ptab" => Some("\t"),
        b"cr" => Some("\n"),
        b"noBreakHyphen" => Some("-"),
        b"br" => match attr_value(reader, e, b"type").as_deref() {
            None | Some("textWrapping") => Some("\n"),
            // Page and column breaks carry no text
            Some(_) => None,
        },
        _ => None,
    }
}

/// Value of a WordprocessingML (or unprefixed) attribute, by local name.
fn attr_value(reader: &NsReader<&[u8]>, e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| {
            let (ns, local) = reader.resolve_attribute(attr.key);
            local.as_ref() == key && (is_wordml(&ns) || matches!(ns, ResolveResult::Unbound))
        })
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
