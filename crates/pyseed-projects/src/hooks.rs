//! pre-commit hook installation

use crate::error::Result;
use crate::layout::ProjectLayout;
use crate::runner::{best_effort, require_success, CommandRunner, Invocation};
use crate::templates::ScaffoldTemplates;
use tracing::{info, warn};

/// Install pre-commit into the environment, write its configuration and
/// register the git hook.
///
/// With `with_notebook` the jupytext sync hook is appended after the base
/// hook set. Registering the git hook needs a repository, so its failure is
/// only logged. Returns whether the git hook was registered.
pub async fn install_hooks(
    runner: &dyn CommandRunner,
    layout: &ProjectLayout,
    templates: &ScaffoldTemplates,
    with_notebook: bool,
) -> Result<bool> {
    info!("Installing pre-commit");
    let pip = Invocation::new(layout.pip().as_str()).args(["install", "pre-commit"]);
    require_success(runner, &pip).await?;

    write_hook_config(layout, templates, with_notebook)?;

    let hook = Invocation::new(layout.python().as_str())
        .args(["-m", "pre_commit", "install"])
        .current_dir(layout.project_dir());
    let registered = best_effort(runner, &hook).await?;
    if !registered {
        warn!("pre-commit hook not registered; run 'pre-commit install' inside a git repository");
    }
    Ok(registered)
}

/// Write `.pre-commit-config.yaml`
pub fn write_hook_config(
    layout: &ProjectLayout,
    templates: &ScaffoldTemplates,
    with_notebook: bool,
) -> Result<()> {
    std::fs::write(
        layout.pre_commit_config(),
        templates.pre_commit_document(with_notebook),
    )?;
    Ok(())
}
