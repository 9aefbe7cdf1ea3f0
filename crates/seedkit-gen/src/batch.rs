//! Assemble tagged rows for one platform.

use std::ops::RangeInclusive;

use seedkit_core::id::TenantId;
use seedkit_core::provenance::ProvenanceTag;
use seedkit_core::scenario::ValidatedScenario;
use seedkit_core::types::{CampaignRow, MetricRow, Platform, PlatformBatch};

use crate::generator::{generate, generate_campaign};

/// Days covered by a `days`-long window: `1..=days`, no gaps.
pub fn day_range(days: u32) -> RangeInclusive<u32> {
    1..=days
}

/// One campaign row plus exactly `days` metric rows, each stamped with the
/// run's provenance tag. `name_override` comes from fixture enrichment.
pub fn build_platform_batch(
    scenario: &ValidatedScenario,
    seed: u64,
    tenant: &TenantId,
    platform: Platform,
    days: u32,
    name_override: Option<&str>,
) -> PlatformBatch {
    let tag = ProvenanceTag::new(&scenario.id, seed);
    let values = generate_campaign(scenario, seed, platform);

    let mut campaign = CampaignRow {
        tenant_id: tenant.clone(),
        platform,
        external_id: values.external_id,
        name: name_override.map(str::to_string).unwrap_or(values.name),
        source: None,
        is_mock_data: None,
    };
    tag.stamp_campaign(&mut campaign);

    let metrics = day_range(days)
        .map(|day| {
            let m = generate(scenario, seed, platform, day);
            let mut row = MetricRow {
                tenant_id: tenant.clone(),
                platform,
                campaign_external_id: campaign.external_id.clone(),
                day,
                impressions: m.impressions,
                clicks: m.clicks,
                cost_cents: m.cost_cents,
                conversions: m.conversions,
                source: None,
                is_mock_data: None,
            };
            tag.stamp_metric(&mut row);
            row
        })
        .collect();

    PlatformBatch {
        platform,
        campaign,
        metrics,
    }
}
