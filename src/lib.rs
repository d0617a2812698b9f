//! Trellis - theme template resolution and output enhancement.
//!
//! Trellis decides which theme template renders a request, captures the
//! rendered document in an output buffer, and runs it through an ordered
//! chain of HTML transforms before it is sent. The bundled transform moves
//! stylesheets printed late in the body back into the head.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and merging
//! - [`enhancement`] - Output buffer stack and the enhancement pipeline
//! - [`error`] - Error types and result aliases
//! - [`hierarchy`] - Query contexts, template candidates, and selection
//! - [`hooks`] - Prioritised, named callback lists
//! - [`html`] - Tag-level HTML processing
//! - [`render`] - One request from template selection to final document
//! - [`styles`] - Stylesheet printing and late-style hoisting
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use trellis::hierarchy::{HierarchyResolver, QueryContext, SiteOptions};
//!
//! let resolver = HierarchyResolver::new(SiteOptions::default());
//! let templates = resolver.resolve_templates(&QueryContext::search());
//! assert_eq!(templates, vec!["search.php"]);
//! ```
//!
//! For file-based config loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod enhancement;
pub mod error;
pub mod hierarchy;
pub mod hooks;
pub mod html;
pub mod render;
pub mod styles;
pub mod ui;

pub use error::{Result, TrellisError};
