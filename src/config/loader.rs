//! Configuration file discovery and loading.

use crate::config::merger::merge_configs;
use crate::config::schema::TrellisConfig;
use crate::error::{Result, TrellisError};
use crate::hierarchy::QueryContext;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".trellis";

/// Paths to configuration files in merge order (later overrides earlier).
///
/// 1. Project config (`.trellis/config.yml`)
/// 2. Local overrides (`.trellis/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .trellis/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .trellis/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// All existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if a project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// A directory containing `.trellis` wins; `.git` is the fallback marker.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_DIR).is_dir() || dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist and
/// `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<TrellisConfig> {
    let value = load_config_value(path)?;
    serde_yaml::from_value(value).map_err(|e| TrellisError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as a raw YAML value, for merging.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read(path, |path| TrellisError::ConfigNotFound { path })?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| TrellisError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // An empty file parses to null; treat it as "no settings".
    Ok(if value.is_null() {
        serde_yaml::Value::Mapping(Default::default())
    } else {
        value
    })
}

/// Load and merge the project's config files.
///
/// Relative theme directories are resolved against `project_root`.
///
/// # Errors
///
/// Returns `ConfigNotFound` if `.trellis/config.yml` does not exist.
pub fn load_merged_config(project_root: &Path) -> Result<TrellisConfig> {
    let paths = ConfigPaths::discover(project_root);
    let primary = project_root.join(CONFIG_DIR).join("config.yml");

    if !paths.has_project_config() {
        return Err(TrellisError::ConfigNotFound { path: primary });
    }

    let layers = paths
        .all_existing()
        .into_iter()
        .map(|path| load_config_value(path))
        .collect::<Result<Vec<_>>>()?;

    let mut config: TrellisConfig =
        serde_yaml::from_value(merge_configs(&layers)).map_err(|e| {
            TrellisError::ConfigParseError {
                path: primary,
                message: format!("Failed to parse merged config: {}", e),
            }
        })?;

    resolve_theme_paths(&mut config, project_root);
    tracing::debug!(
        stylesheet_dir = %config.theme.stylesheet_dir.display(),
        layers = layers.len(),
        "Loaded configuration"
    );
    Ok(config)
}

/// Load config with an optional explicit file.
///
/// With `config_override`, only that file is loaded and relative theme
/// paths resolve against its directory. Otherwise the project's files are
/// discovered and merged; a project without any config gets the defaults.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<TrellisConfig> {
    if let Some(path) = config_override {
        let mut config = load_config_file(path)?;
        let base = path.parent().unwrap_or(project_root);
        resolve_theme_paths(&mut config, base);
        return Ok(config);
    }

    match load_merged_config(project_root) {
        Err(TrellisError::ConfigNotFound { .. }) => {
            let mut config = TrellisConfig::default();
            resolve_theme_paths(&mut config, project_root);
            Ok(config)
        }
        other => other,
    }
}

/// Load a query context description from a YAML (or JSON) file.
pub fn load_query_context(path: &Path) -> Result<QueryContext> {
    let content = read(path, |path| TrellisError::ContextParseError {
        message: "file not found".to_string(),
        path,
    })?;
    serde_yaml::from_str(&content).map_err(|e| TrellisError::ContextParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read(path: &Path, not_found: impl FnOnce(PathBuf) -> TrellisError) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            not_found(path.to_path_buf())
        } else {
            TrellisError::Io(e)
        }
    })
}

fn resolve_theme_paths(config: &mut TrellisConfig, base: &Path) {
    let theme = &mut config.theme;
    if theme.stylesheet_dir.is_relative() {
        theme.stylesheet_dir = base.join(&theme.stylesheet_dir);
    }
    if let Some(dir) = theme.template_dir.as_mut() {
        if dir.is_relative() {
            *dir = base.join(&*dir);
        }
    }
}
