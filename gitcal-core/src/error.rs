//! Error types for gitcal.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a config file that repeats an option.
pub const DUPLICATE_OPTION_EXIT_CODE: u8 = 3;

/// Errors raised while resolving configuration. All of them are fatal and
/// happen before any network request.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No such config file: \"{}\"", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Duplicate option in config file {}: {message}", path.display())]
    DuplicateOption { path: PathBuf, message: String },

    #[error("The config file has no [{0}] section with GitLab connection details")]
    MissingSection(&'static str),

    #[error("Option missing in [{section}]: {option}")]
    MissingOption {
        section: &'static str,
        option: &'static str,
    },

    #[error("Neither a config file nor a URL and a token are given")]
    NoCredentials,

    #[error("There are no groups or projects given")]
    NoTargets,
}

impl ConfigError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::DuplicateOption { .. } => DUPLICATE_OPTION_EXIT_CODE,
            _ => 1,
        }
    }
}

/// Errors returned by the GitLab API client.
#[derive(Error, Debug)]
pub enum GitlabError {
    #[error("Invalid GitLab URL '{0}'")]
    InvalidUrl(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitLab returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GitlabError {
    /// True when the requested project or group does not exist or is hidden
    /// from the current user.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, GitlabError::NotFound(_) | GitlabError::Forbidden(_))
    }
}

/// Errors that abort an export run.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Could not create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write calendar file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Gitlab(#[from] GitlabError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type GitlabResult<T> = Result<T, GitlabError>;
pub type ExportResult<T> = Result<T, ExportError>;
