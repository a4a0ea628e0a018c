//! The scaffolding workflow.
//!
//! [`ScaffoldRequest::resolve`] turns raw arguments into a request, asking
//! the user whatever the arguments leave open. [`Scaffolder::run`] then
//! performs each step in order:
//!
//! 1. project directory and `src/`
//! 2. environment under the venv home, linked as `venv`
//! 3. pip upgrade and requirements
//! 4. `venv.sh`
//! 5. git repository, `tree` alias and `.gitignore`
//! 6. pre-commit hooks
//! 7. notebook tooling, kernel and paired workbook
//!
//! Nothing is rolled back when a step fails; earlier artifacts stay in place.

use crate::config::{MissingNameMode, ScaffoldConfig};
use crate::error::{Error, Result};
use crate::flags::{interpreter_selector, positionals, FeatureFlags};
use crate::git;
use crate::hooks;
use crate::layout::{validate_project_name, ProjectLayout};
use crate::notebook;
use crate::prompt::{LineSource, Prompter};
use crate::requirements::{self, EditorSelector, InstallMode, InstallReport};
use crate::runner::CommandRunner;
use crate::templates::ScaffoldTemplates;
use crate::venv::{self, EnvironmentState};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

/// Everything needed to scaffold one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub name: String,
    /// Interpreter used to create the environment
    pub python: String,
    pub flags: FeatureFlags,
    /// Directory the project is created in
    pub working_dir: Utf8PathBuf,
}

impl ScaffoldRequest {
    /// Resolve a request from raw arguments.
    ///
    /// The project name is the first positional. The interpreter comes from
    /// `python_override`, else a second positional naming python, else the
    /// configured default. Prompts, if any, are asked name first, then flags.
    pub fn resolve<S, L>(
        args: &[S],
        python_override: Option<&str>,
        config: &ScaffoldConfig,
        prompter: &mut Prompter<L>,
        working_dir: &Utf8Path,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        L: LineSource,
    {
        let positional = positionals(args);

        let name = match (positional.first(), config.missing_name) {
            (Some(name), _) => name.clone(),
            (None, MissingNameMode::Require) => return Err(Error::MissingProjectName),
            (None, MissingNameMode::Prompt) => prompter.ask_text("Project directory name")?,
        };
        validate_project_name(&name)?;

        let python = python_override
            .map(str::to_string)
            .or_else(|| interpreter_selector(&positional))
            .unwrap_or_else(|| config.python.clone());

        let flags = FeatureFlags::resolve(args, prompter)?;

        debug!("Resolved request: name={}, python={}, {:?}", name, python, flags);
        Ok(Self {
            name,
            python,
            flags,
            working_dir: working_dir.to_path_buf(),
        })
    }
}

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub layout: ProjectLayout,
    pub flags: FeatureFlags,
    pub environment: EnvironmentState,
    pub requirements: InstallReport,
    pub tree_alias: bool,
    /// `None` when hooks were not requested
    pub hooks_registered: Option<bool>,
    pub notebook: bool,
}

/// Runs the scaffolding steps against a process runner
pub struct Scaffolder<'a> {
    runner: &'a dyn CommandRunner,
    config: &'a ScaffoldConfig,
    templates: &'a ScaffoldTemplates,
}

impl<'a> Scaffolder<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        config: &'a ScaffoldConfig,
        templates: &'a ScaffoldTemplates,
    ) -> Self {
        Self {
            runner,
            config,
            templates,
        }
    }

    /// Layout for a request under the configured venv home
    pub fn layout(&self, request: &ScaffoldRequest) -> Result<ProjectLayout> {
        ProjectLayout::new(
            &request.name,
            &request.working_dir,
            &self.config.venv_home_path(&request.working_dir)?,
        )
    }

    /// Fail before any side effect when a required tool is missing
    pub fn preflight(&self, request: &ScaffoldRequest, layout: &ProjectLayout) -> Result<()> {
        if layout.project_dir().exists() {
            return Err(Error::project_exists(layout.project_dir().as_str()));
        }
        if !layout.env_dir().exists() && !self.runner.is_available(&request.python) {
            return Err(Error::command_not_found(&request.python));
        }
        if request.flags.git && !self.runner.is_available("git") {
            return Err(Error::command_not_found("git"));
        }
        Ok(())
    }

    /// Scaffold the project described by `request`
    pub async fn run(&self, request: &ScaffoldRequest) -> Result<ScaffoldReport> {
        let layout = self.layout(request)?;
        let flags = request.flags;
        self.preflight(request, &layout)?;

        info!("Scaffolding '{}' in {}", layout.name(), layout.project_dir());
        venv::create_project_dirs(&layout)?;

        let environment =
            venv::provision_environment(self.runner, &layout, &request.python).await?;

        requirements::upgrade_installer(self.runner, &layout).await?;

        let mode = if flags.requirements {
            InstallMode::Blocking {
                max_attempts: self.config.requirements.max_attempts,
            }
        } else {
            InstallMode::NonBlocking
        };
        let selector = EditorSelector::new(&self.config.editor);
        let requirements =
            requirements::install_requirements(self.runner, &layout, &selector, mode).await?;

        venv::write_activate_script(&layout, &self.templates.venv_script)?;

        let mut tree_alias = false;
        if flags.git {
            git::init_repository(self.runner, &layout).await?;
            if self.config.git.tree_alias {
                tree_alias =
                    git::add_tree_alias(self.runner, &layout, &self.config.git.tree_alias_format)
                        .await?;
            }
            git::write_gitignore(&layout, self.templates)?;
        }

        let hooks_registered = if flags.pre_commit {
            Some(hooks::install_hooks(self.runner, &layout, self.templates, flags.jupyter).await?)
        } else {
            None
        };

        if flags.jupyter {
            notebook::setup_notebook(self.runner, &layout, self.templates).await?;
        }

        info!("Project '{}' ready", layout.name());
        Ok(ScaffoldReport {
            layout,
            flags,
            environment,
            requirements,
            tree_alias,
            hooks_registered,
            notebook: flags.jupyter,
        })
    }
}
