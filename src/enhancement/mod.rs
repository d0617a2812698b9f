//! Output enhancement pipeline.
//!
//! - [`OutputStack`] - Nested buffering scopes over an output sink
//! - [`Enhancer`] - Decides whether to capture the template, runs transforms
//! - [`apply_rules`] - Declarative tag rules from configuration
//!
//! # Example
//!
//! ```
//! use trellis::enhancement::{Enhancer, OutputStack};
//!
//! let enhancer = Enhancer::new();
//! enhancer.add_filter("shout", 10, |html| Ok(html.replace("hello", "HELLO")));
//!
//! let mut out = OutputStack::new(Vec::new());
//! assert!(enhancer.start(&mut out));
//! out.write("<p>hello</p>").unwrap();
//! out.end_flush().unwrap();
//!
//! assert_eq!(out.sink().as_slice(), b"<p>HELLO</p>");
//! assert_eq!(out.level(), 0);
//! ```

mod buffer;
mod enhancer;
mod rules;

pub use buffer::{FinalizeHandler, OutputStack, ScopeStatus};
pub use enhancer::{
    is_html_content_type, BufferOverride, Enhancer, TransformFn, BUFFER_NAME,
    DEFAULT_CONTENT_TYPE,
};
pub use rules::{apply_rules, install_rules, RULES_TRANSFORM};
