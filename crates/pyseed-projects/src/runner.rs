//! External process execution.
//!
//! Every tool pyseed drives (interpreter, pip, git, editor, jupyter) goes
//! through [`CommandRunner`]. Each call blocks the workflow until the child
//! exits; children inherit the terminal so installers and editors behave as
//! if started by hand.

use crate::error::{Error, Result};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// A fully described process launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<Utf8PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Build from a `[program, args...]` command line
    pub fn from_command_line(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self::new(program.clone()).args(args.iter().cloned()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Whether the argument list contains `needle` verbatim
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How a finished process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn failure(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion.
    ///
    /// A program that cannot be found yields [`Error::CommandNotFound`]; a
    /// non-zero exit is reported through the status, not as an error.
    async fn run(&self, invocation: &Invocation) -> Result<CommandStatus>;

    /// Whether `program` can be located on this system
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Runs programs on the real system with inherited stdio
#[derive(Debug, Default, Clone)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandStatus> {
        debug!("Running: {}", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let status = match cmd.status().await {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::command_not_found(&invocation.program));
            }
            Err(e) => return Err(e.into()),
        };

        debug!("{} exited with {:?}", invocation.program, status.code());
        Ok(CommandStatus {
            code: status.code(),
        })
    }
}

/// Run and fail unless the process exits zero
pub async fn require_success(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
) -> Result<()> {
    let status = runner.run(invocation).await?;
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::command_failed(invocation.to_string(), status.code))
    }
}

/// Run, logging instead of failing on a non-zero exit.
///
/// A missing program is still an error. Returns whether the run succeeded.
pub async fn best_effort(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<bool> {
    let status = runner.run(invocation).await?;
    if !status.is_success() {
        warn!(
            "Ignoring failure of '{}' (exit code: {:?})",
            invocation, status.code
        );
    }
    Ok(status.is_success())
}
