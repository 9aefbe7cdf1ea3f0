//! Step timing hooks.
//!
//! Emitted as `tracing` events under the `seedkit::metrics` target; wire a
//! subscriber layer to forward them to a metrics backend in the binary layer.

use seedkit_core::manifest::{StepName, StepStatus};

pub fn emit_step(step: StepName, status: StepStatus, elapsed_ms: u128) {
    tracing::debug!(
        target: "seedkit::metrics",
        step = step.as_str(),
        status = ?status,
        elapsed_ms = elapsed_ms as u64,
        "step timing"
    );
}

pub fn emit_rows(platform: &str, campaigns: usize, metric_rows: usize) {
    tracing::debug!(
        target: "seedkit::metrics",
        platform,
        campaigns,
        metric_rows,
        "rows written"
    );
}
