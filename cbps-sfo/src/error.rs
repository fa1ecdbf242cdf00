use thiserror::Error;

/// Errors that can occur while reading package metadata.
#[derive(Debug, Error)]
pub enum SfoError {
    /// I/O error while reading the blob
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob does not start with the `\0PSF` magic
    #[error("Invalid PSF magic: expected 00 50 53 46, got {}", hex(.0))]
    InvalidMagic([u8; 4]),

    /// The table layout is inconsistent or a value could not be decoded
    #[error("Invalid PSF format: {0}")]
    InvalidFormat(String),

    /// An index entry uses a value format this reader does not understand
    #[error("Unsupported PSF value format 0x{0:04X} for key {1}")]
    UnsupportedValueFormat(u16, String),

    /// The archive could not be opened or lacks the metadata file
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A required key is absent or has the wrong type
    #[error("Missing field in param.sfo: {0}")]
    MissingField(&'static str),
}

impl SfoError {
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
