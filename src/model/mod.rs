//! Document model for extracted Word content.
//!
//! The parser converts WordprocessingML into these structures, and the
//! renderers turn them into plain text or JSON.

mod document;
mod paragraph;

pub use document::*;
pub use paragraph::*;
