//! Common test helpers for pyseed-projects integration tests
//!
//! Provides a fake process runner that records every invocation and
//! simulates the tools the workflow drives:
//! - `python -m venv <dir>` creates the environment directory
//! - `pip install -r requirements.txt` exits with scripted codes
//! - invocations matching a registered failure exit with its code
//! - everything else succeeds

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use pyseed_projects::runner::{CommandRunner, CommandStatus, Invocation};
use pyseed_projects::{Result, ScaffoldConfig};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ─── Process Mock Infrastructure ─────────────────────────────────────────────

/// Records of CLI command invocations for verification.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    pub calls: Arc<Mutex<Vec<Invocation>>>,
}

#[allow(dead_code)]
impl CommandLog {
    /// Record a command invocation.
    pub fn record(&self, invocation: &Invocation) {
        self.calls.lock().unwrap().push(invocation.clone());
    }

    /// Snapshot of every call so far
    pub fn all(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose program ends with `program`
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.all()
            .into_iter()
            .filter(|c| c.program.ends_with(program))
            .collect()
    }

    /// Number of calls matching a predicate
    pub fn count(&self, pred: impl Fn(&Invocation) -> bool) -> usize {
        self.all().iter().filter(|c| pred(c)).count()
    }

    /// Assert the command was called at least once.
    pub fn assert_called(&self, program: &str) {
        assert!(
            !self.calls_to(program).is_empty(),
            "'{}' was never called. Actual calls: {:?}",
            program,
            self.all()
        );
    }

    /// Assert the command was never called.
    pub fn assert_not_called(&self, program: &str) {
        assert!(
            self.calls_to(program).is_empty(),
            "'{}' was called unexpectedly: {:?}",
            program,
            self.calls_to(program)
        );
    }
}

/// Whether an invocation installs the requirements manifest
pub fn is_requirements_install(inv: &Invocation) -> bool {
    inv.program.ends_with("pip") && inv.has_arg("-r")
}

/// Whether an invocation creates a virtual environment
pub fn is_venv_creation(inv: &Invocation) -> bool {
    inv.args.first().map(String::as_str) == Some("-m") && inv.has_arg("venv")
}

/// Fake runner simulating the scaffolding toolchain
pub struct FakeRunner {
    pub log: CommandLog,
    missing: HashSet<String>,
    install_codes: Mutex<VecDeque<i32>>,
    failures: Vec<(fn(&Invocation) -> bool, i32)>,
}

#[allow(dead_code)]
impl FakeRunner {
    pub fn new() -> Self {
        Self {
            log: CommandLog::default(),
            missing: HashSet::new(),
            install_codes: Mutex::new(VecDeque::new()),
            failures: Vec::new(),
        }
    }

    /// Programs that `is_available` reports missing and `run` cannot find
    pub fn with_missing(mut self, programs: &[&str]) -> Self {
        self.missing = programs.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Exit codes for successive requirement installs; later ones succeed
    pub fn with_install_codes(self, codes: &[i32]) -> Self {
        *self.install_codes.lock().unwrap() = codes.iter().copied().collect();
        self
    }

    /// Invocations matching `pred` exit with `code`
    pub fn failing_when(mut self, pred: fn(&Invocation) -> bool, code: i32) -> Self {
        self.failures.push((pred, code));
        self
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandStatus> {
        if self.missing.contains(&invocation.program) {
            return Err(pyseed_projects::Error::command_not_found(&invocation.program));
        }
        self.log.record(invocation);

        if is_venv_creation(invocation) {
            let env_dir = invocation.args.last().unwrap();
            std::fs::create_dir_all(Utf8Path::new(env_dir).join("bin"))?;
        }

        if let Some((_, code)) = self.failures.iter().find(|(pred, _)| pred(invocation)) {
            return Ok(CommandStatus::failure(*code));
        }

        if is_requirements_install(invocation) {
            let code = self.install_codes.lock().unwrap().pop_front().unwrap_or(0);
            return Ok(CommandStatus { code: Some(code) });
        }

        Ok(CommandStatus::success())
    }

    fn is_available(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }
}

// ─── Workspace Fixtures ──────────────────────────────────────────────────────

/// Scratch area with a working directory and a venv home
pub struct Sandbox {
    _temp: TempDir,
    pub work: Utf8PathBuf,
    pub venvs: Utf8PathBuf,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let work = root.join("work");
        let venvs = root.join("venvs");
        std::fs::create_dir_all(&work).unwrap();

        Self {
            _temp: temp,
            work,
            venvs,
        }
    }

    /// Embedded config pointed at this sandbox's venv home
    pub fn config(&self) -> ScaffoldConfig {
        let mut config = ScaffoldConfig::embedded().unwrap();
        config.venv_home = self.venvs.to_string();
        config
    }
}
