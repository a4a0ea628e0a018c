//! Repository initialization operations

use crate::error::{Error, Result};
use crate::layout::ProjectLayout;
use crate::runner::{require_success, CommandRunner, Invocation};
use crate::templates::ScaffoldTemplates;
use tracing::{debug, info};

/// Initialize a new git repository in the project directory
///
/// # Errors
/// Returns error if:
/// - Project directory doesn't exist
/// - Git is not installed
/// - Git init fails
pub async fn init_repository(runner: &dyn CommandRunner, layout: &ProjectLayout) -> Result<()> {
    let path = layout.project_dir();
    info!("Initializing git repository at: {}", path);

    if !path.exists() {
        return Err(Error::invalid_path(path.as_str()));
    }

    if path.join(".git").exists() {
        debug!("Git repository already exists at: {}", path);
        return Ok(());
    }

    let inv = Invocation::new("git").args(["init", path.as_str()]);
    require_success(runner, &inv).await?;

    info!("Repository initialized successfully");
    Ok(())
}

/// Write the ignore file, one entry per line
pub fn write_gitignore(layout: &ProjectLayout, templates: &ScaffoldTemplates) -> Result<()> {
    let mut content = templates.gitignore_entries().join("\n");
    content.push('\n');

    std::fs::write(layout.gitignore(), content)?;
    debug!("Wrote {}", layout.gitignore());
    Ok(())
}
