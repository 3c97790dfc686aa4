use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for replace_using_package_version operations
#[derive(Error, Debug)]
pub enum ReplaceError {
    #[error("File {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Output directory {} not found", .0.display())]
    OutputDirNotFound(PathBuf),

    #[error("Invalid value for this flag.")]
    InvalidFlagValue,

    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Build recipe error: {0}")]
    Recipe(String),

    #[error("Package {package} not found (not installed and no matching binary package in {searched})")]
    PackageNotFound { package: String, searched: String },

    #[error("Package query failed: {0}")]
    PackageQuery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in replace_using_package_version
pub type Result<T> = std::result::Result<T, ReplaceError>;

impl ReplaceError {
    /// Create a recipe error with context
    pub fn recipe(msg: impl Into<String>) -> Self {
        ReplaceError::Recipe(msg.into())
    }

    /// Create a package query error with context
    pub fn package_query(msg: impl Into<String>) -> Self {
        ReplaceError::PackageQuery(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReplaceError::Config(msg.into())
    }
}
