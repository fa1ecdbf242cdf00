/// Errors that can occur talking to the repository host or file hosts.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Repository has no releases")]
    NoReleases,

    #[error("No recognized asset in any release")]
    NoAsset,

    #[error("Unexpected response (HTTP {status}) from {url}")]
    Transport { status: u16, url: String },

    #[error("Not a GitHub repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GitHubError {
    /// Resolution failures that leave an entry untouched without signalling
    /// a problem with the host itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::NoReleases | Self::NoAsset | Self::InvalidRepoUrl(_)
        )
    }
}
