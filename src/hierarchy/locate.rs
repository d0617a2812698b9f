//! Theme template lookup.
//!
//! Search order for each name (first match wins):
//! 1. Child theme (stylesheet directory)
//! 2. Parent theme (template directory)

use std::path::{Component, Path, PathBuf};

use crate::config::ThemeConfig;

/// Finds template files in the active theme's search path.
#[derive(Debug, Clone)]
pub struct ThemeLocator {
    roots: Vec<PathBuf>,
}

impl ThemeLocator {
    /// Create a locator for a theme, with an optional parent theme.
    pub fn new(stylesheet_dir: impl Into<PathBuf>, template_dir: Option<PathBuf>) -> Self {
        let mut locator = Self { roots: Vec::new() };
        locator.switch_theme(stylesheet_dir, template_dir);
        locator
    }

    /// Create a locator from theme configuration.
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        Self::new(theme.stylesheet_dir.clone(), theme.template_dir.clone())
    }

    /// Point the locator at a different theme. Later lookups use the new
    /// search path.
    pub fn switch_theme(&mut self, stylesheet_dir: impl Into<PathBuf>, template_dir: Option<PathBuf>) {
        let stylesheet_dir = stylesheet_dir.into();
        self.roots.clear();
        if let Some(template_dir) = template_dir {
            if template_dir != stylesheet_dir {
                self.roots.push(stylesheet_dir);
                self.roots.push(template_dir);
                return;
            }
        }
        self.roots.push(stylesheet_dir);
    }

    /// Directories searched, in order.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Locate the first existing template among `names`.
    ///
    /// Names are tried in order; for each name every search root is tried
    /// before moving to the next name.
    pub fn locate<S: AsRef<str>>(&self, names: &[S]) -> Option<PathBuf> {
        for name in names {
            let name = name.as_ref().trim_start_matches('/');
            if name.is_empty() {
                continue;
            }
            if let Some(path) = self.find(name) {
                tracing::debug!(template = name, path = %path.display(), "Located template");
                return Some(path);
            }
        }
        None
    }

    /// Check whether a single template exists anywhere in the search path.
    pub fn exists(&self, name: &str) -> bool {
        self.find(name.trim_start_matches('/')).is_some()
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            tracing::debug!(template = name, "Skipping template name outside the theme");
            return None;
        }
        self.roots
            .iter()
            .map(|root| root.join(Path::new(name)))
            .find(|path| path.is_file())
    }
}
