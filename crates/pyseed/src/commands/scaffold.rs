//! `pyseed <name> [python] [feature words...]` handler

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use pyseed_projects::prompt::{Prompter, TerminalInput};
use pyseed_projects::runner::SystemRunner;
use pyseed_projects::summary::render_summary;
use pyseed_projects::{ScaffoldConfig, ScaffoldRequest, ScaffoldTemplates, Scaffolder};

use tracing::debug;

use crate::cli::Cli;
use crate::output;

/// Scaffold a new project in the current directory
pub async fn run(cli: Cli) -> Result<()> {
    let config =
        ScaffoldConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let templates = ScaffoldTemplates::load(config.templates_dir.as_deref())
        .context("Failed to load templates")?;
    debug!("Venv home: {}, interpreter: {}", config.venv_home, config.python);

    let working_dir = std::env::current_dir().context("Failed to read current directory")?;
    let working_dir = Utf8PathBuf::from_path_buf(working_dir)
        .map_err(|p| anyhow::anyhow!("Current directory is not valid UTF-8: {}", p.display()))?;

    let mut prompter = Prompter::new(TerminalInput);
    let request = ScaffoldRequest::resolve(
        cli.args.as_slice(),
        cli.python.as_deref(),
        &config,
        &mut prompter,
        &working_dir,
    )?;

    let runner = SystemRunner;
    let scaffolder = Scaffolder::new(&runner, &config, &templates);
    let layout = scaffolder.layout(&request)?;

    output::header("Create Python Project");
    output::kv("Project name", &request.name);
    output::kv("Interpreter", &request.python);
    output::kv("Location", layout.project_dir().as_str());
    output::kv("Environment", layout.env_dir().as_str());
    println!();

    output::info("Creating project...");
    let report = scaffolder
        .run(&request)
        .await
        .with_context(|| format!("Failed to scaffold '{}'", request.name))?;

    println!("\n");
    for line in render_summary(&report) {
        println!("{}", line);
    }
    println!();
    output::success(&format!(
        "Project '{}' created at {}",
        request.name,
        report.layout.project_dir()
    ));

    Ok(())
}
