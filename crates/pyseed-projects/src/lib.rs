//! # pyseed-projects
//!
//! Scaffolding library for the pyseed CLI providing:
//! - Feature flag resolution and interactive prompts
//! - Per-project virtual environments kept outside the project and linked in
//! - An edit-and-install loop over `requirements.txt`
//! - Git, pre-commit and Jupyter setup
//!
//! # Examples
//!
//! ## Scaffold a project
//!
//! ```no_run
//! use camino::Utf8Path;
//! use pyseed_projects::prompt::{Prompter, TerminalInput};
//! use pyseed_projects::runner::SystemRunner;
//! use pyseed_projects::{ScaffoldConfig, ScaffoldRequest, ScaffoldTemplates, Scaffolder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScaffoldConfig::load(None)?;
//! let templates = ScaffoldTemplates::load(config.templates_dir.as_deref())?;
//! let mut prompter = Prompter::new(TerminalInput);
//!
//! let args = ["my-project", "python3.12", "jupyter", "no-pre-commit"];
//! let request = ScaffoldRequest::resolve(
//!     &args,
//!     None,
//!     &config,
//!     &mut prompter,
//!     Utf8Path::new("/home/me/code"),
//! )?;
//!
//! let report = Scaffolder::new(&SystemRunner, &config, &templates)
//!     .run(&request)
//!     .await?;
//! println!("Created {}", report.layout.project_dir());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod flags;
pub mod git;
pub mod hooks;
pub mod layout;
pub mod notebook;
pub mod prompt;
pub mod requirements;
pub mod runner;
pub mod scaffold;
pub mod summary;
pub mod templates;
pub mod venv;

pub use error::{Error, Result};

// Re-export the workflow entry points for convenience
pub use config::ScaffoldConfig;
pub use flags::FeatureFlags;
pub use scaffold::{ScaffoldReport, ScaffoldRequest, Scaffolder};
pub use templates::ScaffoldTemplates;
