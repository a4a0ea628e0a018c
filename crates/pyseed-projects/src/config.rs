//! Layered configuration for pyseed
//!
//! Loads settings with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.pyseed/config.yaml, or an explicit path)
//! 3. Environment variables (PYSEED_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use std::env;
use tracing::debug;

const EMBEDDED_DEFAULTS: &str = include_str!("../config/defaults.yaml");

/// Environment variable overriding the environments base directory
pub const ENV_VENV_HOME: &str = "PYSEED_VENV_HOME";
/// Environment variable overriding the default interpreter
pub const ENV_PYTHON: &str = "PYSEED_PYTHON";
/// Environment variable overriding the preferred editor command line
pub const ENV_EDITOR: &str = "PYSEED_EDITOR";

/// What to do when no project name is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingNameMode {
    /// Fail before any side effect
    Require,
    /// Ask for the name on the terminal
    Prompt,
}

/// Editor command lines, each as program followed by arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    pub preferred: Vec<String>,
    pub fallback: Vec<String>,
}

/// Requirements loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsConfig {
    /// Give up after this many failed installs. Unset means keep going.
    pub max_attempts: Option<u32>,
}

/// Git setup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Register the `tree` log alias in the new repository
    pub tree_alias: bool,
    /// Command the alias expands to
    pub tree_alias_format: String,
}

/// Resolved pyseed settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Base directory holding one environment per project; `~` is expanded
    pub venv_home: String,
    /// Default interpreter used to create environments
    pub python: String,
    pub missing_name: MissingNameMode,
    pub editor: EditorConfig,
    pub requirements: RequirementsConfig,
    pub git: GitConfig,
    /// Directory whose files replace embedded templates of the same name
    pub templates_dir: Option<Utf8PathBuf>,
}

impl ScaffoldConfig {
    /// Built-in defaults only
    pub fn embedded() -> Result<Self> {
        Ok(serde_yaml_ng::from_str(EMBEDDED_DEFAULTS)?)
    }

    /// Defaults overlaid with a (possibly partial) YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut base: Value = serde_yaml_ng::from_str(EMBEDDED_DEFAULTS)?;
        let overlay: Value = serde_yaml_ng::from_str(yaml)?;

        if !overlay.is_null() && !overlay.is_mapping() {
            return Err(Error::invalid_config("top level must be a mapping"));
        }

        merge_values(&mut base, overlay);
        Ok(serde_yaml_ng::from_value(base)?)
    }

    /// Load the full configuration stack.
    ///
    /// An explicit path must exist; the default user file is optional.
    pub fn load(explicit_path: Option<&Utf8Path>) -> Result<Self> {
        let config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let user_file = default_config_path()?;
                if user_file.exists() {
                    Self::from_file(&user_file)?
                } else {
                    debug!("No user config at {}, using defaults", user_file);
                    Self::embedded()?
                }
            }
        };

        config.apply_env_overrides()
    }

    fn from_file(path: &Utf8Path) -> Result<Self> {
        debug!("Loading config from {}", path);
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_config(format!("cannot read {}: {}", path, e))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Apply PYSEED_* environment variable overrides
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(home) = env::var(ENV_VENV_HOME) {
            if !home.trim().is_empty() {
                self.venv_home = home;
            }
        }

        if let Ok(python) = env::var(ENV_PYTHON) {
            if !python.trim().is_empty() {
                self.python = python;
            }
        }

        if let Ok(editor) = env::var(ENV_EDITOR) {
            let parts: Vec<String> = editor.split_whitespace().map(str::to_string).collect();
            if !parts.is_empty() {
                self.editor.preferred = parts;
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.venv_home.trim().is_empty() {
            return Err(Error::invalid_config("venv_home must not be empty"));
        }
        if self.python.trim().is_empty() {
            return Err(Error::invalid_config("python must not be empty"));
        }
        if self.editor.preferred.is_empty() && self.editor.fallback.is_empty() {
            return Err(Error::invalid_config(
                "at least one of editor.preferred or editor.fallback is required",
            ));
        }
        if self.requirements.max_attempts == Some(0) {
            return Err(Error::invalid_config(
                "requirements.max_attempts must be at least 1",
            ));
        }
        Ok(())
    }

    /// Environments base directory with `~` expanded.
    ///
    /// A relative setting is taken from `base`, the directory pyseed runs in,
    /// so the environment and the link into the project name the same place.
    pub fn venv_home_path(&self, base: &Utf8Path) -> Result<Utf8PathBuf> {
        let path = expand_home(&self.venv_home)?;
        if path.is_relative() {
            Ok(base.join(path))
        } else {
            Ok(path)
        }
    }
}

/// Default user config file (~/.pyseed/config.yaml)
pub fn default_config_path() -> Result<Utf8PathBuf> {
    Ok(home_dir()?.join(".pyseed").join("config.yaml"))
}

/// Get the user's home directory
///
/// Prefers the HOME environment variable so that overriding it in scripts
/// and tests is honoured; falls back to the platform lookup.
pub fn home_dir() -> Result<Utf8PathBuf> {
    let home = match env::var("HOME") {
        Ok(home) if !home.is_empty() => std::path::PathBuf::from(home),
        _ => dirs::home_dir().ok_or(Error::HomeDirUnknown)?,
    };

    Utf8PathBuf::from_path_buf(home).map_err(|p| Error::invalid_path(p.display().to_string()))
}

fn expand_home(path: &str) -> Result<Utf8PathBuf> {
    if path == "~" {
        return home_dir();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(Utf8PathBuf::from(path))
}

/// Deep-merge `overlay` into `base`; mappings merge, everything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}
