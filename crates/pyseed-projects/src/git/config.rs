//! Git configuration management

use crate::error::{Error, Result};
use crate::layout::ProjectLayout;
use crate::runner::{CommandRunner, Invocation};
use camino::Utf8Path;
use tracing::{debug, info, warn};

/// Name of the decorated graph log alias
pub const TREE_ALIAS: &str = "tree";

/// Add a value to the repository's local git configuration
///
/// # Arguments
/// * `runner` - Process runner
/// * `repo` - Repository path
/// * `key` - Configuration key (e.g., "alias.tree")
/// * `value` - Configuration value
pub async fn set_local_config(
    runner: &dyn CommandRunner,
    repo: &Utf8Path,
    key: &str,
    value: &str,
) -> Result<()> {
    debug!("Setting git config: {} = {}", key, value);

    let inv = Invocation::new("git")
        .args(["config", "--local", "--add", key, value])
        .current_dir(repo);

    let status = runner.run(&inv).await?;
    if !status.is_success() {
        return Err(Error::command_failed(inv.to_string(), status.code));
    }

    Ok(())
}

/// Register the `tree` alias in the project's repository.
///
/// Best effort: a failure is logged and reported as `false`.
pub async fn add_tree_alias(
    runner: &dyn CommandRunner,
    layout: &ProjectLayout,
    format: &str,
) -> Result<bool> {
    let key = format!("alias.{}", TREE_ALIAS);
    match set_local_config(runner, layout.project_dir(), &key, format).await {
        Ok(()) => {
            info!("Registered git alias '{}'", TREE_ALIAS);
            Ok(true)
        }
        Err(Error::CommandFailed { command, code }) => {
            warn!("Could not register git alias ({} exited with {})", command, code);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
