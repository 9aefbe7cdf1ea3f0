//! Scenario descriptors: the loaded (untrusted) shape and the validated form.
//!
//! Loaders hand back a `ScenarioDescriptor` with stringly fields exactly as
//! authored. `ScenarioDescriptor::validate` is the only way to obtain a
//! `ValidatedScenario`, which is what the generator accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::ScenarioId;

/// Descriptor schema versions this pipeline understands.
pub const SUPPORTED_SCHEMA_VERSIONS: &[&str] = &["1", "1.0", "1.1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Stable,
    Growth,
    Decline,
    Seasonal,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Stable => "STABLE",
            Trend::Growth => "GROWTH",
            Trend::Decline => "DECLINE",
            Trend::Seasonal => "SEASONAL",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STABLE" => Ok(Trend::Stable),
            "GROWTH" => Ok(Trend::Growth),
            "DECLINE" => Ok(Trend::Decline),
            "SEASONAL" => Ok(Trend::Seasonal),
            other => Err(Error::Scenario(format!("unknown trend '{other}'"))),
        }
    }
}

/// Optional fixture a scenario draws enrichment data from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRef {
    pub name: String,
    /// BLAKE3 hex digest of the fixture bytes.
    pub checksum: String,
}

/// Scenario as authored. Nothing here is trusted until `validate` runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub schema_version: String,
    pub id: ScenarioId,
    pub name: String,
    pub trend: String,
    pub base_impressions: i64,
    pub default_days: i64,
    #[serde(default)]
    pub fixture: Option<FixtureRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedScenario {
    pub id: ScenarioId,
    pub name: String,
    pub trend: Trend,
    pub base_impressions: u64,
    pub default_days: u32,
    pub fixture: Option<FixtureRef>,
}

impl ScenarioDescriptor {
    pub fn validate(&self) -> Result<ValidatedScenario> {
        if !SUPPORTED_SCHEMA_VERSIONS.contains(&self.schema_version.trim()) {
            return Err(Error::Scenario(format!(
                "unsupported schema version '{}' (supported: {})",
                self.schema_version,
                SUPPORTED_SCHEMA_VERSIONS.join(", ")
            )));
        }
        validate_scenario_id(&self.id)?;
        let trend: Trend = self.trend.parse()?;
        if self.base_impressions <= 0 {
            return Err(Error::Scenario(format!(
                "base_impressions must be positive, got {}",
                self.base_impressions
            )));
        }
        if self.default_days <= 0 || self.default_days > i64::from(u32::MAX) {
            return Err(Error::Scenario(format!(
                "default_days must be a positive day count, got {}",
                self.default_days
            )));
        }
        if let Some(fx) = &self.fixture {
            if fx.name.trim().is_empty() || fx.checksum.trim().is_empty() {
                return Err(Error::Scenario(
                    "fixture reference needs both name and checksum".into(),
                ));
            }
        }

        Ok(ValidatedScenario {
            id: self.id.clone(),
            name: self.name.clone(),
            trend,
            base_impressions: self.base_impressions as u64,
            default_days: self.default_days as u32,
            fixture: self.fixture.clone(),
        })
    }
}

/// Scenario ids end up inside provenance tags and external ids, so they are
/// restricted to characters that cannot break either format.
fn validate_scenario_id(id: &ScenarioId) -> Result<()> {
    let s = id.as_str();
    if s.is_empty() {
        return Err(Error::Scenario("scenario id is empty".into()));
    }
    if let Some(bad) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(Error::Scenario(format!(
            "scenario id '{s}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}
