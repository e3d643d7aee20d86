/// All errors that can be returned by a TabularStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Credential material is missing or malformed. The message is
    /// operator-facing remediation text and is displayed verbatim.
    #[error("{0}")]
    Credentials(String),

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("tabular store request failed: {0}")]
    Transport(String),

    /// The remote service answered with a non-success status.
    #[error("tabular store rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// A range that cannot address the requested cells.
    #[error("invalid cell range: {0}")]
    InvalidRange(String),

    /// A backend-specific error (unexpected payload, join failure, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
