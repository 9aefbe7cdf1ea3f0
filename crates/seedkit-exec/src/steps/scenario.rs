//! LOAD_SCENARIO and VALIDATE_SCENARIO.

use seedkit_core::id::ScenarioId;
use seedkit_core::scenario::{ScenarioDescriptor, ValidatedScenario};
use seedkit_core::types::Platform;
use seedkit_io::{CampaignNames, FixtureProvider, ScenarioLoader};

use crate::steps::Completed;
use crate::ExecError;

/// A validated scenario plus whatever its fixture contributed.
#[derive(Debug, Clone)]
pub struct PreparedScenario {
    pub scenario: ValidatedScenario,
    pub campaign_names: Option<CampaignNames>,
}

impl PreparedScenario {
    pub fn campaign_name(&self, platform: Platform) -> Option<&str> {
        self.campaign_names.as_ref().and_then(|n| n.get(platform))
    }
}

pub fn load(
    loader: &dyn ScenarioLoader,
    id: &ScenarioId,
) -> Result<Completed<ScenarioDescriptor>, ExecError> {
    let descriptor = loader
        .load(id)
        .map_err(|e| ExecError::Scenario(e.to_string()))?;
    // Rows are tagged with the loaded id; it must be the one that was asked for.
    if &descriptor.id != id {
        return Err(ExecError::Scenario(format!(
            "loader returned scenario '{}' for '{}'",
            descriptor.id, id
        )));
    }
    let detail = format!("schema_version={}", descriptor.schema_version);
    Ok(Completed::success(descriptor).with_detail(detail))
}

pub fn validate(
    descriptor: &ScenarioDescriptor,
    fixtures: Option<&dyn FixtureProvider>,
) -> Result<Completed<PreparedScenario>, ExecError> {
    let scenario = descriptor
        .validate()
        .map_err(|e| ExecError::Scenario(e.to_string()))?;

    let Some(fx) = scenario.fixture.clone() else {
        let detail = format!("trend={}", scenario.trend);
        return Ok(Completed::success(PreparedScenario {
            scenario,
            campaign_names: None,
        })
        .with_detail(detail));
    };

    let provider = fixtures.ok_or_else(|| {
        ExecError::Scenario(format!(
            "scenario references fixture '{}' but no fixture provider is configured",
            fx.name
        ))
    })?;
    let fixture = provider
        .load_fixture(&fx.name)
        .map_err(|e| ExecError::Scenario(e.to_string()))?;
    provider
        .validate_checksum(&fixture, &fx.checksum)
        .map_err(|e| ExecError::Scenario(e.to_string()))?;
    let names =
        CampaignNames::from_fixture(&fixture).map_err(|e| ExecError::Scenario(e.to_string()))?;

    let detail = format!("trend={}, fixture={}", scenario.trend, fx.name);
    Ok(Completed::success(PreparedScenario {
        scenario,
        campaign_names: Some(names),
    })
    .with_detail(detail))
}
