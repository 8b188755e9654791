//! Output rendering for documents.
//!
//! # Example
//!
//! ```no_run
//! use docx_text::{parse_file, render::*};
//!
//! let doc = parse_file("document.docx")?;
//!
//! let text = to_text(&doc, &TextOptions::default())?;
//! let json = to_json(&doc, JsonFormat::Pretty)?;
//! # Ok::<(), docx_text::Error>(())
//! ```

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::TextOptions;
pub use text::to_text;
