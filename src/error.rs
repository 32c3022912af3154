//! Error types for pharpack
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pharpack operations
pub type PharpackResult<T> = Result<T, PharpackError>;

/// Main error type for pharpack operations
#[derive(Error, Debug)]
pub enum PharpackError {
    /// Archive writing is disabled by configuration
    #[error(
        "your configuration disabled writing phar files (archive.readonly = true), please update your configuration"
    )]
    Unwritable,

    /// A manifest is missing, unreadable or cannot be decoded
    #[error("unable to parse given path {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    /// The vendor tree (or part of it) is not present on disk
    #[error("directory {path} not properly installed, did you run \"composer install\"?")]
    NotInstalled { path: PathBuf },

    /// The entry point file does not exist
    #[error("bin file \"{path}\" does not exist")]
    MissingEntryPoint { path: PathBuf },

    /// A file selected for rewriting exists but is not valid PHP
    #[error("unable to parse PHP source {path}: {message}")]
    UnparsableSource { path: PathBuf, message: String },

    /// The final rename of the staged archive failed.
    ///
    /// `staging` names the kept staging file; `None` when it could not be kept.
    #[error(
        "unable to rename temporary phar archive {} to {target}: {source}",
        display_staging(.staging)
    )]
    PublishFailed {
        staging: Option<PathBuf>,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file to be archived lives outside the project root
    #[error("path \"{path}\" is not within base project path \"{root}\"")]
    PathOutsideProject { path: PathBuf, root: PathBuf },

    /// An archive could not be read back
    #[error("corrupt phar archive {path}: {message}")]
    CorruptArchive { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PharpackError {
    /// Build an `InvalidInput` error from any displayable cause
    pub fn invalid_input(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::InvalidInput {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// File path the error refers to, when there is one
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::InvalidInput { path, .. }
            | Self::NotInstalled { path }
            | Self::MissingEntryPoint { path }
            | Self::UnparsableSource { path, .. }
            | Self::PathOutsideProject { path, .. }
            | Self::CorruptArchive { path, .. } => Some(path),
            Self::PublishFailed { staging, .. } => staging.as_deref(),
            Self::Unwritable | Self::Io(_) => None,
        }
    }
}

fn display_staging(staging: &Option<PathBuf>) -> String {
    match staging {
        Some(path) => path.display().to_string(),
        None => "(removed)".to_string(),
    }
}
