//! Template hierarchy resolution.
//!
//! Turns a [`QueryContext`] into an ordered list of candidate template names,
//! lets checkpoint observers adjust each kind's list, and selects the first
//! candidate present in the active theme.
//!
//! # Example
//!
//! ```
//! use trellis::hierarchy::{HierarchyResolver, Post, QueryContext, SiteOptions};
//!
//! let resolver = HierarchyResolver::new(SiteOptions::default());
//! let ctx = QueryContext::singular(Post::new(1, "hello", "post"));
//!
//! assert_eq!(
//!     resolver.resolve_templates(&ctx),
//!     vec!["single-post-hello.php", "single-post.php", "single.php", "singular.php"]
//! );
//! ```

mod candidates;
mod checkpoint;
mod context;
mod kind;
mod locate;
mod resolver;
mod slug;

pub use candidates::{candidates_for, is_valid_template_override};
pub use checkpoint::Checkpoints;
pub use context::{
    Author, Conditions, DateArchive, Post, Queried, QueryContext, ShowOnFront, SiteOptions, Term,
    ATTACHMENT_POST_TYPE, PAGE_POST_TYPE,
};
pub use kind::TemplateKind;
pub use locate::ThemeLocator;
pub use resolver::{HierarchyResolver, KindHierarchy, Selection};
pub use slug::{percent_decode, percent_encode, slug_variants};
