//! Convenient re-exports for downstream crates.

pub use crate::config::{SafetyConfig, SeedkitConfig};
pub use crate::error::{Error, Result};
pub use crate::id::{ScenarioId, TenantId};
pub use crate::manifest::{
    CommandClassification, Invocation, Manifest, ManifestId, RunStatus, SeedOutcome, StepName,
    StepRecord, StepStatus,
};
pub use crate::provenance::ProvenanceTag;
pub use crate::scenario::{FixtureRef, ScenarioDescriptor, Trend, ValidatedScenario};
pub use crate::types::{CampaignRow, MetricRow, Platform, PlatformBatch, SeedRequest};
