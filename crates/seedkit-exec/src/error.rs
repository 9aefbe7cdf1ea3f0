use thiserror::Error;

use seedkit_core::manifest::RunStatus;
use seedkit_core::types::Platform;
use seedkit_io::store::Table;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("environment not safe for synthetic writes: {0}")]
    UnsafeEnvironment(String),

    #[error("scenario: {0}")]
    Scenario(String),

    #[error("invalid request: {0}")]
    Request(String),

    #[error(
        "tenant '{tenant}' holds non-synthetic data ({} {key}); rerun with allow_real_tenant to override",
        .table.as_str()
    )]
    RealTenantData {
        tenant: String,
        table: Table,
        key: String,
    },

    #[error("write failed for {platform} (already committed: {}): {source}", fmt_platforms(.committed))]
    Write {
        platform: Platform,
        committed: Vec<Platform>,
        source: seedkit_io::Error,
    },

    #[error("verification failed: {0}")]
    Verify(String),

    #[error("datastore: {0}")]
    Store(#[from] seedkit_io::Error),

    #[error("hashing error: {0}")]
    Hash(String),

    #[error("internal invariant failed: {0}")]
    Invariant(String),

    #[error("step panicked: {0}")]
    Panic(String),
}

impl ExecError {
    /// Only a hygiene finding blocks; everything else is a plain failure.
    pub fn run_status(&self) -> RunStatus {
        match self {
            ExecError::RealTenantData { .. } => RunStatus::Blocked,
            _ => RunStatus::Failed,
        }
    }
}

fn fmt_platforms(ps: &[Platform]) -> String {
    if ps.is_empty() {
        return "none".to_string();
    }
    ps.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(",")
}
