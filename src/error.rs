// Error taxonomy for apihub-sync
// Uses thiserror so every failure carries a user-facing message

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required sync configuration field is missing. No network I/O happened.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The remote host could not be reached (DNS, timeout, refused connection).
    #[error("failed to connect to YAPI: {0}")]
    ConnectionFailed(#[from] reqwest::Error),

    /// The remote host answered with a non-zero application error code.
    #[error("YAPI error {code}: {message}")]
    RemoteError { code: i64, message: String },

    /// The remote payload did not have the expected JSON shape.
    #[error("failed to decode YAPI response: {0}")]
    DecodeError(String),

    #[error("no interfaces found, please check your YAPI configuration and token permissions")]
    NoInterfaces,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound { kind, id: id.into() }
    }

    /// Errors raised before or while talking to the remote system, before
    /// any local mutation took place.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfig(_)
                | Error::ConnectionFailed(_)
                | Error::RemoteError { .. }
                | Error::DecodeError(_)
                | Error::NoInterfaces
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DecodeError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
