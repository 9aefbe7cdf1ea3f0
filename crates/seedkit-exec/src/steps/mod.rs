//! Pipeline steps. Each step is a plain function returning
//! `Result<Completed<T>, ExecError>`; the runtime owns ordering and recording.

pub mod hygiene;
pub mod safety;
pub mod scenario;
pub mod verify;
pub mod writer;

use std::panic::{catch_unwind, AssertUnwindSafe};

use seedkit_core::manifest::{StepName, StepRecord, StepStatus};

use crate::ExecError;

/// A step that finished without failing.
#[derive(Debug)]
pub struct Completed<T> {
    pub value: T,
    pub status: StepStatus,
    pub detail: Option<String>,
}

impl<T> Completed<T> {
    pub fn success(value: T) -> Self {
        Self {
            value,
            status: StepStatus::Success,
            detail: None,
        }
    }

    pub fn skipped(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            status: StepStatus::Skipped,
            detail: Some(reason.into()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn record(&self, name: StepName) -> StepRecord {
        StepRecord {
            name,
            status: self.status,
            error: None,
            detail: self.detail.clone(),
        }
    }
}

/// Run a step body, turning a panic inside a collaborator into an error.
pub(crate) fn guarded<T>(
    body: impl FnOnce() -> Result<Completed<T>, ExecError>,
) -> Result<Completed<T>, ExecError> {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "non-string panic payload".to_string()
            };
            Err(ExecError::Panic(msg))
        }
    }
}
