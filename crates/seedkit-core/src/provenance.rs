//! Provenance tags stamped on every synthetic row.
//!
//! A run is identified by `(scenario, seed)`. Its tag prefix,
//! `toolkit:unified:<scenario>:<seed>`, is both what the hygiene gate trusts as
//! "ours" and what the idempotent writer deletes by, so every row-level source
//! string must keep it as a literal prefix.

use crate::id::ScenarioId;
use crate::types::{CampaignRow, MetricRow, Platform};

pub const SOURCE_NAMESPACE: &str = "toolkit:unified";
pub const EXTERNAL_ID_NAMESPACE: &str = "unified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceTag {
    scenario_id: ScenarioId,
    seed: u64,
    prefix: String,
}

impl ProvenanceTag {
    pub fn new(scenario_id: &ScenarioId, seed: u64) -> Self {
        Self {
            scenario_id: scenario_id.clone(),
            seed,
            prefix: format!("{SOURCE_NAMESPACE}:{scenario_id}:{seed}"),
        }
    }

    /// Run-scoped source prefix: `toolkit:unified:<scenario>:<seed>`.
    pub fn source_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn campaign_source(&self, platform: Platform) -> String {
        format!("{}:{}:campaign", self.prefix, platform)
    }

    pub fn metric_source(&self, platform: Platform, day: u32) -> String {
        format!("{}:{}:d{}", self.prefix, platform, day)
    }

    /// `unified-<scenario>-<seed>-<platform>-<index>`. Never time-derived.
    pub fn external_id(&self, platform: Platform, index: u32) -> String {
        format!(
            "{EXTERNAL_ID_NAMESPACE}-{}-{}-{}-{}",
            self.scenario_id, self.seed, platform, index
        )
    }

    pub fn external_id_prefix(&self) -> String {
        format!("{EXTERNAL_ID_NAMESPACE}-{}-{}-", self.scenario_id, self.seed)
    }

    /// True when `source` belongs to this run. The match stops at a `:`
    /// boundary so seed `99` never claims rows written by seed `990`.
    pub fn owns_source(&self, source: Option<&str>) -> bool {
        source.is_some_and(|s| source_in_scope(&self.prefix, s))
    }

    pub fn stamp_campaign(&self, row: &mut CampaignRow) {
        row.source = Some(self.campaign_source(row.platform));
        row.is_mock_data = Some(true);
    }

    pub fn stamp_metric(&self, row: &mut MetricRow) {
        row.source = Some(self.metric_source(row.platform, row.day));
        row.is_mock_data = Some(true);
    }

    pub fn campaign_is_tagged(&self, row: &CampaignRow) -> bool {
        row.is_mock_data == Some(true) && self.owns_source(row.source.as_deref())
    }

    pub fn metric_is_tagged(&self, row: &MetricRow) -> bool {
        row.is_mock_data == Some(true) && self.owns_source(row.source.as_deref())
    }
}

/// Boundary-aware prefix match shared by the tagger and store predicates.
pub fn source_in_scope(prefix: &str, source: &str) -> bool {
    match source.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(':'),
        None => false,
    }
}
