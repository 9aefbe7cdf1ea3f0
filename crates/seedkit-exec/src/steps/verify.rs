//! VERIFY: read back what EXECUTE committed.
//!
//! Checks run against the store, not the generated batches: the provenance
//! columns must still exist, each platform must hold exactly one tagged
//! campaign and one tagged metric row per day of the window.

use std::collections::BTreeSet;

use seedkit_io::store::PROVENANCE_COLUMNS;
use seedkit_io::{CampaignFilter, DataStore, MetricFilter, Table};

use crate::steps::hygiene::SeedPlan;
use crate::steps::Completed;
use crate::ExecError;

fn check_columns(store: &dyn DataStore, table: Table, extra: &[&str]) -> Result<(), ExecError> {
    let cols = store.column_names(table)?;
    let missing: Vec<&str> = PROVENANCE_COLUMNS
        .iter()
        .chain(extra)
        .copied()
        .filter(|c| !cols.iter().any(|have| have == c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExecError::Verify(format!(
            "{} is missing provenance column(s): {}",
            table.as_str(),
            missing.join(", ")
        )))
    }
}

pub fn verify(store: &dyn DataStore, plan: &SeedPlan) -> Result<Completed<()>, ExecError> {
    check_columns(store, Table::Campaigns, &["external_id"])?;
    check_columns(store, Table::Metrics, &[])?;

    let prefix = plan.tag.source_prefix().to_string();
    let id_prefix = plan.tag.external_id_prefix();
    let mut total_rows = 0usize;

    for &platform in &plan.platforms {
        // No is_mock_data constraint: a run-scoped row missing its flag must fail here.
        let campaigns = store.find_campaigns(&CampaignFilter {
            tenant_id: plan.tenant_id.clone(),
            platform: Some(platform),
            is_mock_data: None,
            source_prefix: Some(prefix.clone()),
        })?;
        let [campaign] = campaigns.as_slice() else {
            return Err(ExecError::Verify(format!(
                "{platform}: expected 1 campaign, found {}",
                campaigns.len()
            )));
        };
        if !plan.tag.campaign_is_tagged(campaign) || !campaign.external_id.starts_with(&id_prefix)
        {
            return Err(ExecError::Verify(format!(
                "{platform}: campaign {} is not tagged for this run",
                campaign.external_id
            )));
        }

        let metrics = store.find_metrics(&MetricFilter {
            tenant_id: plan.tenant_id.clone(),
            is_mock_data: None,
            source_prefix: Some(prefix.clone()),
            platforms: Some(vec![platform]),
        })?;
        if metrics.len() != plan.days as usize {
            return Err(ExecError::Verify(format!(
                "{platform}: expected {} metric rows, found {}",
                plan.days,
                metrics.len()
            )));
        }
        if let Some(m) = metrics.iter().find(|m| !plan.tag.metric_is_tagged(m)) {
            return Err(ExecError::Verify(format!(
                "{platform}: metric row for day {} is not tagged as mock data",
                m.day
            )));
        }
        let days: BTreeSet<u32> = metrics.iter().map(|m| m.day).collect();
        if days.len() != metrics.len()
            || days.first() != Some(&1)
            || days.last() != Some(&plan.days)
        {
            return Err(ExecError::Verify(format!(
                "{platform}: metric days do not cover 1..={}",
                plan.days
            )));
        }
        total_rows += metrics.len();
    }

    Ok(Completed::success(()).with_detail(format!(
        "verified {} platform(s), {total_rows} metric rows",
        plan.platforms.len()
    )))
}
