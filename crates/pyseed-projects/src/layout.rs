//! Paths of everything a scaffold run creates

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Name of the environment link inside the project
pub const VENV_LINK: &str = "venv";
/// Requirements manifest file name
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
/// Activation snippet file name
pub const VENV_SCRIPT_FILE: &str = "venv.sh";
/// Ignore file name
pub const GITIGNORE_FILE: &str = ".gitignore";
/// Hook configuration file name
pub const PRE_COMMIT_FILE: &str = ".pre-commit-config.yaml";
/// Template notebook file name
pub const NOTEBOOK_FILE: &str = "workbook.ipynb";

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

/// Check a project name can be used as a directory, environment and kernel name
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_project_name(name, "Name must not be empty"));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_project_name(
            name,
            "Name must not be a relative directory reference",
        ));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(Error::invalid_project_name(
            name,
            "Name must not contain path separators",
        ));
    }
    Ok(())
}

/// Paths for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    name: String,
    project_dir: Utf8PathBuf,
    env_dir: Utf8PathBuf,
}

impl ProjectLayout {
    /// Layout for `name` under `working_dir`, with its environment under `venv_home`
    pub fn new(name: &str, working_dir: &Utf8Path, venv_home: &Utf8Path) -> Result<Self> {
        validate_project_name(name)?;
        Ok(Self {
            name: name.to_string(),
            project_dir: working_dir.join(name),
            env_dir: venv_home.join(name),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project_dir(&self) -> &Utf8Path {
        &self.project_dir
    }

    pub fn src_dir(&self) -> Utf8PathBuf {
        self.project_dir.join("src")
    }

    /// Base directory holding every project's environment
    pub fn venv_home(&self) -> &Utf8Path {
        self.env_dir.parent().unwrap_or(&self.env_dir)
    }

    /// The environment itself, outside the project
    pub fn env_dir(&self) -> &Utf8Path {
        &self.env_dir
    }

    /// Link inside the project pointing at the environment
    pub fn venv_link(&self) -> Utf8PathBuf {
        self.project_dir.join(VENV_LINK)
    }

    fn venv_bin(&self, tool: &str) -> Utf8PathBuf {
        let file = if cfg!(windows) {
            format!("{}.exe", tool)
        } else {
            tool.to_string()
        };
        self.venv_link().join(BIN_DIR).join(file)
    }

    /// Interpreter inside the linked environment
    pub fn python(&self) -> Utf8PathBuf {
        self.venv_bin("python")
    }

    /// Package installer inside the linked environment
    pub fn pip(&self) -> Utf8PathBuf {
        self.venv_bin("pip")
    }

    /// Interactive shell inside the linked environment
    pub fn ipython(&self) -> Utf8PathBuf {
        self.venv_bin("ipython")
    }

    pub fn requirements(&self) -> Utf8PathBuf {
        self.project_dir.join(REQUIREMENTS_FILE)
    }

    pub fn venv_script(&self) -> Utf8PathBuf {
        self.project_dir.join(VENV_SCRIPT_FILE)
    }

    pub fn gitignore(&self) -> Utf8PathBuf {
        self.project_dir.join(GITIGNORE_FILE)
    }

    pub fn pre_commit_config(&self) -> Utf8PathBuf {
        self.project_dir.join(PRE_COMMIT_FILE)
    }

    pub fn notebook(&self) -> Utf8PathBuf {
        self.project_dir.join(NOTEBOOK_FILE)
    }
}
