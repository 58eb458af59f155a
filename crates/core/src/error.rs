//! Error types for s3ctl-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for s3ctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3ctl operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed storage URI
    #[error("Invalid S3 URI: {0}")]
    InvalidUri(String),

    /// Local precondition violated; raised before any request is issued
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, timeout, or mid-stream failure; not retried
    #[error("Network error: {0}")]
    Transport(String),

    /// Response body did not parse as the expected XML
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Bucket does not exist
    #[error("Bucket '{0}' does not exist")]
    BucketNotFound(String),

    /// Bucket already exists
    #[error("Bucket '{0}' already exists")]
    BucketExists(String),

    /// Bucket still contains objects
    #[error("Bucket '{0}' is not empty")]
    BucketNotEmpty(String),

    /// Object does not exist
    #[error("Object '{0}' does not exist")]
    KeyNotFound(String),

    /// Service refused access to the resource
    #[error("Access to '{0}' was denied")]
    AccessDenied(String),

    /// Service error with a code outside the translation table, kept intact
    /// so callers can still inspect the original code
    #[error("Service error {code}: {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Parameter(_) => 2,                              // UsageError
            Error::InvalidUri(_) => 2,                             // UsageError
            Error::Config(_) => 2,                                 // UsageError
            Error::Transport(_) => 3,                              // NetworkError
            Error::AccessDenied(_) => 4,                           // AuthError
            Error::BucketNotFound(_) | Error::KeyNotFound(_) => 5, // NotFound
            Error::BucketExists(_) | Error::BucketNotEmpty(_) => 6, // Conflict
            _ => 1,                                                // GeneralError
        }
    }
}
