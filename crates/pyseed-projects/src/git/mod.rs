//! Git operations module
//!
//! Repository setup for a freshly scaffolded project:
//! - Repository initialization
//! - Ignore file
//! - Local configuration (the `tree` log alias)

mod config;
mod init;

// Re-export public API
pub use config::{add_tree_alias, set_local_config, TREE_ALIAS};
pub use init::{init_repository, write_gitignore};
