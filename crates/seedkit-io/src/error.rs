use thiserror::Error;

/// Result type local to seedkit-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("scenario '{0}' not found")]
    ScenarioNotFound(String),

    #[error("scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("fixture '{0}' not found")]
    FixtureNotFound(String),

    #[error("fixture checksum mismatch for '{name}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("fixture error: {0}")]
    Fixture(String),

    #[error("datastore error: {0}")]
    Store(String),

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
