//! Requirements manifest editing and installation

use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::layout::{ProjectLayout, REQUIREMENTS_FILE};
use crate::runner::{best_effort, require_success, CommandRunner, Invocation};
use camino::Utf8Path;
use std::fs::OpenOptions;
use tracing::{debug, info, warn};

/// How requirements get installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Edit, install, and go back to editing until the install succeeds
    Blocking { max_attempts: Option<u32> },
    /// Install once without editing; failure is fatal
    NonBlocking,
}

/// What the installation step did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub attempts: u32,
    pub editor_launches: u32,
}

/// Upgrade pip inside the environment. Failures are logged and ignored.
pub async fn upgrade_installer(runner: &dyn CommandRunner, layout: &ProjectLayout) -> Result<()> {
    info!("Upgrading pip");
    let inv = Invocation::new(layout.pip().as_str()).args(["install", "--upgrade", "pip"]);
    match best_effort(runner, &inv).await {
        Ok(_) => Ok(()),
        Err(Error::CommandNotFound { command }) => {
            warn!("Could not upgrade pip, {} not found", command);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Create the manifest if it is missing, leaving existing content alone
pub fn touch_manifest(path: &Utf8Path) -> Result<()> {
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

/// An editor chosen to open the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorChoice {
    pub invocation: Invocation,
    /// Chosen because the preferred editor is unavailable
    pub is_fallback: bool,
}

/// Picks the editor to open the manifest with
#[derive(Debug, Clone)]
pub struct EditorSelector {
    candidates: Vec<(Vec<String>, bool)>,
}

impl EditorSelector {
    pub fn new(config: &EditorConfig) -> Self {
        let candidates = [(&config.preferred, false), (&config.fallback, true)]
            .into_iter()
            .filter(|(line, _)| !line.is_empty())
            .map(|(line, is_fallback)| (line.clone(), is_fallback))
            .collect();
        Self { candidates }
    }

    /// First configured editor the runner can find
    pub fn select(&self, runner: &dyn CommandRunner) -> Option<EditorChoice> {
        self.candidates
            .iter()
            .filter_map(|(line, is_fallback)| {
                Invocation::from_command_line(line).map(|invocation| EditorChoice {
                    invocation,
                    is_fallback: *is_fallback,
                })
            })
            .find(|choice| runner.is_available(&choice.invocation.program))
    }
}

/// Open the manifest in an editor and wait for it to close.
///
/// Returns whether an editor was launched. When neither editor is installed
/// the manifest stays as it is. Only the preferred editor's failure is fatal;
/// a failing fallback is logged and the install goes ahead.
pub async fn edit_manifest(
    runner: &dyn CommandRunner,
    selector: &EditorSelector,
    manifest: &Utf8Path,
) -> Result<bool> {
    let Some(editor) = selector.select(runner) else {
        warn!("No editor found, {} left unedited", manifest);
        return Ok(false);
    };

    println!("close editor window to proceed");
    let inv = editor.invocation.arg(manifest.as_str());
    match runner.run(&inv).await {
        Ok(status) if status.is_success() => Ok(true),
        Ok(status) if editor.is_fallback => {
            warn!(
                "Editor '{}' exited with code {:?}, continuing",
                inv.program, status.code
            );
            Ok(true)
        }
        Ok(_) => Err(Error::editor_failed(inv.program.as_str(), manifest.as_str())),
        Err(Error::CommandNotFound { command }) => {
            debug!("Editor {} vanished before launch", command);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Install the manifest with pip from the project directory
fn install_invocation(layout: &ProjectLayout) -> Invocation {
    Invocation::new(layout.pip().as_str())
        .args(["install", "-r", REQUIREMENTS_FILE])
        .current_dir(layout.project_dir())
}

/// Install the requirements manifest according to `mode`
pub async fn install_requirements(
    runner: &dyn CommandRunner,
    layout: &ProjectLayout,
    selector: &EditorSelector,
    mode: InstallMode,
) -> Result<InstallReport> {
    let manifest = layout.requirements();
    let mut report = InstallReport::default();

    match mode {
        InstallMode::NonBlocking => {
            touch_manifest(&manifest)?;
            report.attempts = 1;
            require_success(runner, &install_invocation(layout)).await?;
        }
        InstallMode::Blocking { max_attempts } => loop {
            touch_manifest(&manifest)?;
            if edit_manifest(runner, selector, &manifest).await? {
                report.editor_launches += 1;
            }

            report.attempts += 1;
            let status = runner.run(&install_invocation(layout)).await?;
            if status.is_success() {
                break;
            }

            warn!(
                "Installing {} failed (attempt {}), reopening editor",
                REQUIREMENTS_FILE, report.attempts
            );
            if max_attempts.is_some_and(|cap| report.attempts >= cap) {
                return Err(Error::InstallAttemptsExhausted {
                    attempts: report.attempts,
                });
            }
        },
    }

    info!(
        "Requirements installed after {} attempt(s)",
        report.attempts
    );
    Ok(report)
}
