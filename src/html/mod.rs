//! HTML document processing for output transforms.
//!
//! - [`TagProcessor`] - Walk tags, edit attributes, text and elements

mod processor;
mod text;

pub use processor::TagProcessor;
pub use text::{decode_entities, escape_attribute, escape_text};
