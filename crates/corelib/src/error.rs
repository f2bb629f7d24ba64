//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building rings or routing a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The caller handed over no candidate addresses.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The configured digest primitive does not exist in this build.
    #[error("Hashing unavailable: {0}")]
    HashingUnavailable(String),
    /// Configuration values are out of range or malformed.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    /// A lookup hit a ring without virtual nodes.
    #[error("Ring operation failed: ring is empty")]
    EmptyRing,
}

impl Error {
    pub fn no_candidates(service: &str) -> Self {
        Error::InvalidInput(format!("no candidate addresses for service `{}`", service))
    }
}
