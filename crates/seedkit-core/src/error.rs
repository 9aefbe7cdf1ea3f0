use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error("Invalid request: {0}")]
    Request(String),

    #[error("Unknown platform '{0}'")]
    UnknownPlatform(String),

    #[error("Hashing error: {0}")]
    Hash(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
