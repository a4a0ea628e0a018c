//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::Parser;

const LONG_ABOUT: &str = "\
Create a Python project directory with its own virtual environment.

The environment lives in the venv home (default ~/venvs/<name>) and is linked
into the project as ./venv. By default pyseed opens requirements.txt in an
editor and installs it, reopening the editor until the install succeeds,
then initializes git.

Feature words may be given anywhere after the name, in any case, with or
without dashes and underscores:

  jupyter / no-jupyter            install jupyter, register a kernel and
                                  create a paired workbook (asked if omitted)
  pre-commit / no-pre-commit      install pre-commit hooks (asked if omitted)
  requirements / no-requirements  edit requirements.txt before installing
                                  (default: requirements)
  git / no-git                    initialize a git repository (default: git)
  help / -h                       show this text

A second positional containing 'python' (e.g. python3.12) selects the
interpreter used to create the environment.";

/// pyseed - scaffold a Python project with its own environment
#[derive(Parser, Debug)]
#[command(name = "pyseed")]
#[command(author, version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a pyseed config file (default: ~/.pyseed/config.yaml)
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Interpreter used to create the environment
    #[arg(long, value_name = "INTERPRETER")]
    pub python: Option<String>,

    /// Project name, optional interpreter and feature words
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}
