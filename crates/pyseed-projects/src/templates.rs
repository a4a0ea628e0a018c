//! Fixed documents written into new projects.
//!
//! The embedded copies live in `templates/` and are compiled in. A
//! configured templates directory can replace any of them by file name.
//! Templates are loaded once and handed to the steps that write them.

use crate::error::{Error, Result};
use camino::Utf8Path;
use serde_yaml_ng::Value;
use tracing::debug;

/// File name of the ignore-file template
pub const GITIGNORE: &str = "gitignore";
/// File name of the activation snippet template
pub const VENV_SCRIPT: &str = "venv.sh";
/// File name of the base hook configuration
pub const PRE_COMMIT_CONFIG: &str = "pre-commit-config.yaml";
/// File name of the notebook hook addition
pub const PRE_COMMIT_NOTEBOOK: &str = "pre-commit-notebook.yaml";
/// File name of the starter notebook
pub const NOTEBOOK: &str = "workbook.ipynb";

/// Immutable set of project templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldTemplates {
    pub gitignore: String,
    pub venv_script: String,
    pub pre_commit_config: String,
    pub pre_commit_notebook: String,
    pub notebook: String,
}

impl ScaffoldTemplates {
    /// Templates compiled into the binary
    pub fn embedded() -> Self {
        Self {
            gitignore: include_str!("../templates/gitignore").to_string(),
            venv_script: include_str!("../templates/venv.sh").to_string(),
            pre_commit_config: include_str!("../templates/pre-commit-config.yaml").to_string(),
            pre_commit_notebook: include_str!("../templates/pre-commit-notebook.yaml")
                .to_string(),
            notebook: include_str!("../templates/workbook.ipynb").to_string(),
        }
    }

    /// Embedded templates, with any file present in `dir` taking precedence
    pub fn with_overrides(dir: &Utf8Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::invalid_path(dir.as_str()));
        }

        let mut templates = Self::embedded();
        for (name, slot) in [
            (GITIGNORE, &mut templates.gitignore),
            (VENV_SCRIPT, &mut templates.venv_script),
            (PRE_COMMIT_CONFIG, &mut templates.pre_commit_config),
            (PRE_COMMIT_NOTEBOOK, &mut templates.pre_commit_notebook),
            (NOTEBOOK, &mut templates.notebook),
        ] {
            let path = dir.join(name);
            if path.is_file() {
                debug!("Template override: {}", path);
                *slot = std::fs::read_to_string(&path)?;
            }
        }

        templates.validate()?;
        Ok(templates)
    }

    /// Load for a configuration: overrides when a directory is set
    pub fn load(templates_dir: Option<&Utf8Path>) -> Result<Self> {
        let templates = match templates_dir {
            Some(dir) => Self::with_overrides(dir)?,
            None => Self::embedded(),
        };
        templates.validate()?;
        Ok(templates)
    }

    /// Check the structured templates parse
    pub fn validate(&self) -> Result<()> {
        let notebook: serde_json::Value = serde_json::from_str(&self.notebook)
            .map_err(|e| Error::invalid_template(NOTEBOOK, e.to_string()))?;
        if !notebook.get("cells").is_some_and(|c| c.is_array()) {
            return Err(Error::invalid_template(NOTEBOOK, "missing 'cells' array"));
        }

        for with_notebook in [false, true] {
            let name = if with_notebook {
                PRE_COMMIT_NOTEBOOK
            } else {
                PRE_COMMIT_CONFIG
            };
            let doc: Value = serde_yaml_ng::from_str(&self.pre_commit_document(with_notebook))
                .map_err(|e| Error::invalid_template(name, e.to_string()))?;
            if !doc.get("repos").is_some_and(Value::is_sequence) {
                return Err(Error::invalid_template(name, "missing 'repos' list"));
            }
        }

        if self.gitignore.lines().all(|l| l.trim().is_empty()) {
            return Err(Error::invalid_template(GITIGNORE, "no entries"));
        }

        Ok(())
    }

    /// Hook configuration: the base set, then the notebook addition if asked
    pub fn pre_commit_document(&self, with_notebook: bool) -> String {
        let mut doc = self.pre_commit_config.clone();
        if with_notebook {
            doc.push_str(&self.pre_commit_notebook);
        }
        doc
    }

    /// Ignore-file entries, one per line
    pub fn gitignore_entries(&self) -> Vec<&str> {
        self.gitignore
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

impl Default for ScaffoldTemplates {
    fn default() -> Self {
        Self::embedded()
    }
}
