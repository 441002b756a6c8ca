use thiserror::Error;

/// Errors raised while turning uploaded bytes into a `Table`.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file name's extension maps to no known parser. Raised before any
    /// byte of the payload is inspected.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The file parsed structurally but holds no data rows.
    #[error("{0}")]
    EmptyData(String),

    /// The payload is malformed for its claimed format.
    #[error("{0}")]
    Format(String),
}
