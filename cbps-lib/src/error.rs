use cbps_catalog::CatalogError;
use cbps_github::GitHubError;
use cbps_sfo::SfoError;
use thiserror::Error;

/// Errors from checking or building a single entry.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Package metadata: {0}")]
    Sfo(#[from] SfoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog row itself can't be checked (bad type, bad source URL).
    #[error("Invalid catalog entry ({id}): {reason}")]
    InvalidEntry { id: String, reason: String },
}

impl UpdateError {
    pub fn invalid_entry(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Failures that only mean "leave this entry as it is".
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::GitHub(e) => e.is_recoverable(),
            Self::InvalidEntry { .. } => true,
            _ => false,
        }
    }
}
