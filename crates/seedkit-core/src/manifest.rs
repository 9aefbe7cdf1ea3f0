//! Run manifest: the ordered audit trail of one seeding invocation.
//!
//! Steps are recorded in pipeline order only; a step that never ran is absent
//! rather than present with a placeholder status. The manifest is returned to
//! the caller on every outcome, including blocked and failed runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::hash::Hash256;

pub const COMMAND_NAME: &str = "seed-unified-scenario";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// "Tool used against unsafe state". Stable: callers branch on it.
pub const EXIT_BLOCKED: i32 = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

/// Pipeline steps. Declaration order is execution order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepName {
    SafetyCheck,
    LoadScenario,
    ValidateScenario,
    ValidateInput,
    Execute,
    Verify,
}

impl StepName {
    pub const ORDER: [StepName; 6] = [
        StepName::SafetyCheck,
        StepName::LoadScenario,
        StepName::ValidateScenario,
        StepName::ValidateInput,
        StepName::Execute,
        StepName::Verify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepName::SafetyCheck => "SAFETY_CHECK",
            StepName::LoadScenario => "LOAD_SCENARIO",
            StepName::ValidateScenario => "VALIDATE_SCENARIO",
            StepName::ValidateInput => "VALIDATE_INPUT",
            StepName::Execute => "EXECUTE",
            StepName::Verify => "VERIFY",
        }
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Success,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Success,
    Blocked,
    Failed,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => EXIT_SUCCESS,
            RunStatus::Blocked => EXIT_BLOCKED,
            RunStatus::Failed => EXIT_FAILURE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandClassification {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub command_name: String,
    pub command_classification: CommandClassification,
}

impl Invocation {
    pub fn seed(classification: CommandClassification) -> Self {
        Self {
            command_name: COMMAND_NAME.to_string(),
            command_classification: classification,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub name: StepName,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Informational note (row counts, override notices, dry-run plan).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepRecord {
    pub fn success(name: StepName) -> Self {
        Self {
            name,
            status: StepStatus::Success,
            error: None,
            detail: None,
        }
    }

    pub fn failed(name: StepName, error: impl Into<String>) -> Self {
        Self {
            name,
            status: StepStatus::Failed,
            error: Some(error.into()),
            detail: None,
        }
    }

    pub fn skipped(name: StepName, reason: impl Into<String>) -> Self {
        Self {
            name,
            status: StepStatus::Skipped,
            error: None,
            detail: Some(reason.into()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: ManifestId,
    pub invocation: Invocation,
    pub steps: Vec<StepRecord>,

    /// Crate version string for provenance.
    pub engine_version: String,

    /// Hex BLAKE3 digest of the request as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_digest: Option<String>,

    /// Hex BLAKE3 digest of the generated rows (identical requests match).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_digest: Option<String>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl Manifest {
    pub fn new(invocation: Invocation, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            invocation,
            steps: Vec::with_capacity(StepName::ORDER.len()),
            engine_version: crate::VERSION.to_string(),
            request_digest: None,
            payload_digest: None,
            started_ms,
            finished_ms: started_ms,
        }
    }

    /// Append a step outcome. Steps must arrive in pipeline order, each at
    /// most once.
    pub fn record(&mut self, step: StepRecord) -> Result<()> {
        if let Some(last) = self.steps.last() {
            if step.name <= last.name {
                return Err(Error::Invariant(format!(
                    "step {} recorded after {}",
                    step.name, last.name
                )));
            }
        }
        self.steps.push(step);
        Ok(())
    }

    pub fn step(&self, name: StepName) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn step_names(&self) -> Vec<StepName> {
        self.steps.iter().map(|s| s.name).collect()
    }

    pub fn set_request_digest(&mut self, h: Hash256) {
        self.request_digest = Some(h.to_hex());
    }

    pub fn set_payload_digest(&mut self, h: Hash256) {
        self.payload_digest = Some(h.to_hex());
    }

    pub fn finish(mut self, finished_ms: u64) -> Self {
        self.finished_ms = finished_ms;
        self
    }
}

/// What a run hands back to its caller, whatever happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedOutcome {
    pub status: RunStatus,
    pub exit_code: i32,
    pub manifest: Manifest,
}

impl SeedOutcome {
    pub fn new(status: RunStatus, manifest: Manifest) -> Self {
        Self {
            status,
            exit_code: status.exit_code(),
            manifest,
        }
    }
}
