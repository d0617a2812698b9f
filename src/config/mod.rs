//! Configuration loading for Trellis.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layered merging in [`merger`]
//!
//! # Example
//!
//! ```
//! use trellis::config::{load_merged_config, BufferMode};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".trellis");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "enhancement:\n  buffer: force\n").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.enhancement.buffer, BufferMode::Force);
//! ```
//!
//! # Configuration File Locations
//!
//! Trellis merges configuration in this order:
//! 1. Project config (`.trellis/config.yml`)
//! 2. Local overrides (`.trellis/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    load_query_context, ConfigPaths, CONFIG_DIR,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    BufferMode, EnhancementConfig, StyleConfig, TagRule, ThemeConfig, TrellisConfig,
};
