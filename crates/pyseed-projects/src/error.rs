//! Error types for pyseed-projects

use thiserror::Error;

/// Result type alias using pyseed-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Project directory already exists
    #[error("Project already exists at: {path}")]
    ProjectExists { path: String },

    /// Invalid project name
    #[error("Invalid project name: '{name}'. {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// No project name given and prompting is disabled
    #[error("Please enter a project directory name")]
    MissingProjectName,

    /// Required command not found
    #[error("Required command not found: {command}")]
    CommandNotFound { command: String },

    /// External command exited unsuccessfully
    #[error("Command failed: {command} (exit code: {code})")]
    CommandFailed { command: String, code: String },

    /// Virtual environment creation failed
    #[error("Failed to create virtual environment at {path}: {message}")]
    EnvironmentCreation { path: String, message: String },

    /// Editor exited unsuccessfully
    #[error("Editor '{editor}' exited with an error while editing {path}")]
    EditorFailed { editor: String, path: String },

    /// Requirements installation gave up after the configured cap
    #[error("Requirements installation failed after {attempts} attempt(s)")]
    InstallAttemptsExhausted { attempts: u32 },

    /// Interactive input ended before a valid answer was given
    #[error("Input closed while waiting for an answer to: {question}")]
    InputClosed { question: String },

    /// Template content is malformed
    #[error("Invalid template '{name}': {message}")]
    InvalidTemplate { name: String, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Home directory could not be determined
    #[error("Could not determine home directory")]
    HomeDirUnknown,

    /// Invalid path
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// Terminal interaction error from dialoguer
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a project exists error
    pub fn project_exists(path: impl Into<String>) -> Self {
        Self::ProjectExists { path: path.into() }
    }

    /// Create an invalid project name error
    pub fn invalid_project_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, code: Option<i32>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code: code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
        }
    }

    /// Create an environment creation error
    pub fn environment_creation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnvironmentCreation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an editor failed error
    pub fn editor_failed(editor: impl Into<String>, path: impl Into<String>) -> Self {
        Self::EditorFailed {
            editor: editor.into(),
            path: path.into(),
        }
    }

    /// Create an input closed error
    pub fn input_closed(question: impl Into<String>) -> Self {
        Self::InputClosed {
            question: question.into(),
        }
    }

    /// Create an invalid template error
    pub fn invalid_template(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Whether this error means a program could not be found on the system
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CommandNotFound { .. })
    }
}
