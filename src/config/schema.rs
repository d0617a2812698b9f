//! Configuration schema for `.trellis/config.yml`.
//!
//! ```yaml
//! theme:
//!   stylesheet_dir: themes/child
//!   template_dir: themes/parent
//!   block_theme: false
//!   supports: [wp-block-styles]
//! site:
//!   show_on_front: page
//!   page_on_front: 3
//! enhancement:
//!   buffer: auto
//!   rules:
//!     - tag: html
//!       set_attribute: { lang: es }
//! styles:
//!   - handle: main
//!     src: /css/main.css
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::hierarchy::SiteOptions;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    /// Active theme.
    pub theme: ThemeConfig,

    /// Reading options that influence template resolution.
    pub site: SiteOptions,

    /// Output enhancement settings.
    pub enhancement: EnhancementConfig,

    /// Stylesheets the render command enqueues.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<StyleConfig>,
}

/// The active theme and what it supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme directory searched first (the child theme).
    pub stylesheet_dir: PathBuf,

    /// Parent theme directory, searched second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,

    /// Whether this is a block theme.
    #[serde(skip_serializing_if = "is_false")]
    pub block_theme: bool,

    /// Declared theme features, e.g. `wp-block-styles`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supports: Vec<String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            stylesheet_dir: PathBuf::from("."),
            template_dir: None,
            block_theme: false,
            supports: Vec::new(),
        }
    }
}

impl ThemeConfig {
    /// Whether the theme declares `feature`.
    pub fn supports(&self, feature: &str) -> bool {
        self.supports.iter().any(|f| f == feature)
    }

    /// Whether this is a classic (non-block) theme.
    pub fn is_classic(&self) -> bool {
        !self.block_theme
    }
}

/// How the enhancement buffer decides whether to start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferMode {
    /// Buffer when a transform is registered.
    #[default]
    Auto,
    /// Always buffer.
    Force,
    /// Never buffer.
    Block,
}

/// Output enhancement settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    /// Buffering decision.
    pub buffer: BufferMode,

    /// Response content type. Defaults to `text/html`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Declarative edits applied to the rendered document.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<TagRule>,
}

/// A declarative edit applied to every element named `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Element name, case-insensitive.
    pub tag: String,

    /// Attributes to set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set_attribute: BTreeMap<String, String>,

    /// Replacement for the element's text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_text: Option<String>,
}

/// A stylesheet registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub handle: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,

    /// Inline CSS printed after the stylesheet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline: Vec<String>,

    /// Enqueue after the head has been printed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub late: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}
