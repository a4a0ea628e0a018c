//! Project directory and virtual environment provisioning

use crate::error::{Error, Result};
use crate::layout::ProjectLayout;
use crate::runner::{CommandRunner, Invocation};
use camino::Utf8Path;
use tracing::{debug, info};

/// Create the project directory and its `src` subdirectory.
///
/// An existing project directory is an error; nothing inside it is touched.
pub fn create_project_dirs(layout: &ProjectLayout) -> Result<()> {
    let project_dir = layout.project_dir();
    info!("Creating project directory: {}", project_dir);

    match std::fs::create_dir(project_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(Error::project_exists(project_dir.as_str()));
        }
        Err(e) => return Err(e.into()),
    }

    std::fs::create_dir(layout.src_dir())?;
    Ok(())
}

/// Whether provisioning made a new environment or reused one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentState {
    Created,
    Reused,
}

/// Make sure the project's environment exists and link it into the project.
///
/// The environment is only created when its directory is missing. The link
/// is always written.
pub async fn provision_environment(
    runner: &dyn CommandRunner,
    layout: &ProjectLayout,
    python: &str,
) -> Result<EnvironmentState> {
    std::fs::create_dir_all(layout.venv_home())?;

    let env_dir = layout.env_dir();
    let state = if env_dir.exists() {
        info!("Reusing existing environment: {}", env_dir);
        EnvironmentState::Reused
    } else {
        info!("Creating environment with {}: {}", python, env_dir);
        let inv = Invocation::new(python).args(["-m", "venv", env_dir.as_str()]);
        let status = runner.run(&inv).await.map_err(|e| match e {
            Error::CommandNotFound { .. } => e,
            other => Error::environment_creation(env_dir.as_str(), other.to_string()),
        })?;

        if !status.is_success() {
            return Err(Error::environment_creation(
                env_dir.as_str(),
                format!("'{}' exited with code {:?}", inv, status.code),
            ));
        }
        EnvironmentState::Created
    };

    link_environment(env_dir, &layout.venv_link())?;
    Ok(state)
}

/// Symlink `link` to the environment directory
fn link_environment(env_dir: &Utf8Path, link: &Utf8Path) -> Result<()> {
    debug!("Linking {} -> {}", link, env_dir);

    #[cfg(unix)]
    std::os::unix::fs::symlink(env_dir, link)?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_dir(env_dir, link)?;

    Ok(())
}

/// Write the one-line activation snippet
pub fn write_activate_script(layout: &ProjectLayout, content: &str) -> Result<()> {
    std::fs::write(layout.venv_script(), content)?;
    Ok(())
}
