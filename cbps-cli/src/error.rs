use thiserror::Error;

use cbps_catalog::CatalogError;
use cbps_github::GitHubError;
use cbps_lib::UpdateError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog file could not be read, built or written
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("{0}")]
    Update(#[from] UpdateError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Something the tool deliberately does not handle
    #[error("Not supported: {0}")]
    Unsupported(String),

    /// Input ended before a required answer was given
    #[error("Input closed")]
    InputClosed,
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
