//! The seeding runtime.
//!
//! Owns the collaborators, walks the steps in order, and turns whatever
//! happens into a `SeedOutcome`. Steps that never ran are absent from the
//! manifest.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use seedkit_core::config::SafetyConfig;
use seedkit_core::manifest::{
    CommandClassification, Invocation, Manifest, RunStatus, SeedOutcome, StepName, StepRecord,
};
use seedkit_core::types::SeedRequest;
use seedkit_io::{DataStore, FixtureProvider, ScenarioLoader};

use crate::metrics::emit_step;
use crate::replay::{payload_digest, request_digest};
use crate::steps::{guarded, hygiene, safety, scenario, verify, writer, Completed};
use crate::ExecError;

pub struct Seeder {
    safety: SafetyConfig,
    loader: Arc<dyn ScenarioLoader>,
    store: Arc<dyn DataStore>,
    fixtures: Option<Arc<dyn FixtureProvider>>,
}

impl Seeder {
    pub fn new(
        safety: SafetyConfig,
        loader: Arc<dyn ScenarioLoader>,
        store: Arc<dyn DataStore>,
    ) -> Self {
        Self {
            safety,
            loader,
            store,
            fixtures: None,
        }
    }

    pub fn with_fixtures(mut self, fixtures: Arc<dyn FixtureProvider>) -> Self {
        self.fixtures = Some(fixtures);
        self
    }

    pub fn safety(&self) -> &SafetyConfig {
        &self.safety
    }

    /// Run one request to completion. Never panics out and never returns an
    /// error: failures are reported through the outcome's status and manifest.
    pub fn run(&self, request: &SeedRequest) -> SeedOutcome {
        let classification = if request.dry_run {
            CommandClassification::Read
        } else {
            CommandClassification::Write
        };
        let mut manifest = Manifest::new(Invocation::seed(classification), now_millis());

        let span = tracing::info_span!(
            "seed",
            tenant = %request.tenant_id,
            scenario = %request.scenario_id,
            seed = request.seed,
            dry_run = request.dry_run
        );
        let _guard = span.enter();

        match request_digest(request) {
            Ok(h) => manifest.set_request_digest(h),
            Err(e) => tracing::warn!(error = %e, "request digest unavailable"),
        }

        let status = match self.drive(request, &mut manifest) {
            Ok(()) => RunStatus::Success,
            Err(e) => e.run_status(),
        };
        tracing::info!(status = ?status, steps = manifest.steps.len(), "run finished");

        SeedOutcome::new(status, manifest.finish(now_millis()))
    }

    fn drive(&self, request: &SeedRequest, manifest: &mut Manifest) -> Result<(), ExecError> {
        step(manifest, StepName::SafetyCheck, || safety::check(&self.safety))?;

        let descriptor = step(manifest, StepName::LoadScenario, || {
            scenario::load(self.loader.as_ref(), &request.scenario_id)
        })?;

        let prepared = step(manifest, StepName::ValidateScenario, || {
            scenario::validate(&descriptor, self.fixtures.as_deref())
        })?;

        let plan = step(manifest, StepName::ValidateInput, || {
            hygiene::check(self.store.as_ref(), request, &prepared.scenario)
        })?;

        let batches = step(manifest, StepName::Execute, || {
            writer::execute(self.store.as_ref(), &prepared, &plan)
        })?;
        match payload_digest(&batches) {
            Ok(h) => manifest.set_payload_digest(h),
            Err(e) => tracing::warn!(error = %e, "payload digest unavailable"),
        }

        if plan.dry_run {
            step(manifest, StepName::Verify, || {
                Ok(Completed::skipped((), "dry run: nothing written"))
            })?;
        } else {
            step(manifest, StepName::Verify, || {
                verify::verify(self.store.as_ref(), &plan)
            })?;
        }
        Ok(())
    }
}

/// Run one step, record it, and hand back its value.
fn step<T>(
    manifest: &mut Manifest,
    name: StepName,
    body: impl FnOnce() -> Result<Completed<T>, ExecError>,
) -> Result<T, ExecError> {
    let t0 = Instant::now();
    let result = guarded(body);
    let elapsed = t0.elapsed().as_millis();

    let (record, out) = match result {
        Ok(done) => {
            tracing::info!(
                step = name.as_str(),
                status = ?done.status,
                detail = done.detail.as_deref().unwrap_or(""),
                "step finished"
            );
            (done.record(name), Ok(done.value))
        }
        Err(err) => {
            tracing::warn!(step = name.as_str(), error = %err, "step failed");
            let mut rec = StepRecord::failed(name, err.to_string());
            if err.run_status() == RunStatus::Blocked {
                rec = rec.with_detail("blocked: tenant holds real data");
            }
            (rec, Err(err))
        }
    };

    emit_step(name, record.status, elapsed);
    manifest
        .record(record)
        .map_err(|e| ExecError::Invariant(e.to_string()))?;
    out
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
