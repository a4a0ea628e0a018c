//! Jupyter notebook setup

use crate::error::Result;
use crate::layout::{ProjectLayout, NOTEBOOK_FILE};
use crate::runner::{require_success, CommandRunner, Invocation};
use crate::templates::ScaffoldTemplates;
use tracing::info;

/// Packages installed for notebook work
pub const NOTEBOOK_PACKAGES: [&str; 3] = ["jupyter", "ipython", "jupytext"];

/// Formats kept in sync by jupytext
pub const PAIRED_FORMATS: &str = "ipynb,py:percent";

/// Install notebook tooling, register a kernel named after the project,
/// write the starter notebook and pair it with a percent-format script.
pub async fn setup_notebook(
    runner: &dyn CommandRunner,
    layout: &ProjectLayout,
    templates: &ScaffoldTemplates,
) -> Result<()> {
    info!("Installing notebook tooling");
    let install = Invocation::new(layout.pip().as_str())
        .arg("install")
        .args(NOTEBOOK_PACKAGES);
    require_success(runner, &install).await?;

    info!("Registering kernel '{}'", layout.name());
    let kernel = Invocation::new(layout.ipython().as_str())
        .args(["kernel", "install", "--user"])
        .arg(format!("--name={}", layout.name()));
    require_success(runner, &kernel).await?;

    std::fs::write(layout.notebook(), &templates.notebook)?;

    let pair = Invocation::new(layout.python().as_str())
        .args(["-m", "jupytext", "--set-formats", PAIRED_FORMATS, NOTEBOOK_FILE])
        .current_dir(layout.project_dir());
    require_success(runner, &pair).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandStatus;
    use async_trait::async_trait;
    use camino::Utf8PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<Invocation>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, invocation: &Invocation) -> Result<CommandStatus> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(CommandStatus::success())
        }
    }

    #[tokio::test]
    async fn test_setup_notebook_sequence() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let layout = ProjectLayout::new("analysis", &root, &root.join("venvs")).unwrap();
        std::fs::create_dir_all(layout.project_dir()).unwrap();
        let templates = ScaffoldTemplates::embedded();
        let runner = RecordingRunner::default();

        setup_notebook(&runner, &layout, &templates).await.unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].args, vec!["install", "jupyter", "ipython", "jupytext"]);
        assert_eq!(calls[1].program, layout.ipython().as_str());
        assert_eq!(
            calls[1].args,
            vec!["kernel", "install", "--user", "--name=analysis"]
        );
        assert_eq!(
            calls[2].args,
            vec!["-m", "jupytext", "--set-formats", "ipynb,py:percent", "workbook.ipynb"]
        );
        assert_eq!(calls[2].cwd.as_deref(), Some(layout.project_dir()));

        let written = std::fs::read_to_string(layout.notebook()).unwrap();
        assert_eq!(written, templates.notebook);
    }
}
