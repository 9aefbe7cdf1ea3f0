//! EXECUTE: generate, then replace this run's rows platform by platform.
//!
//! Each platform commits in its own transaction:
//! delete the platform's tagged campaigns, create one campaign, create its
//! metric rows. The first transaction additionally clears this run's metric
//! rows for every requested platform, so a run issues exactly one metric
//! delete.
//!
//! A failure part-way leaves earlier platforms committed; the error says
//! which. Once the metric delete has committed, every platform not yet
//! written has lost its metrics, so a compensating transaction deletes
//! those platforms' tagged campaigns too. A platform is therefore either
//! fully rewritten or left with neither campaign nor metrics for this run,
//! never a campaign without metrics.

use seedkit_core::types::{Platform, PlatformBatch};
use seedkit_gen::build_platform_batch;
use seedkit_io::{CampaignFilter, DataStore, MetricFilter, Transaction};

use crate::metrics::emit_rows;
use crate::steps::hygiene::SeedPlan;
use crate::steps::scenario::PreparedScenario;
use crate::steps::Completed;
use crate::ExecError;

/// Generate every batch the plan asks for, in plan platform order.
pub fn plan_batches(prepared: &PreparedScenario, plan: &SeedPlan) -> Vec<PlatformBatch> {
    plan.platforms
        .iter()
        .map(|&p| {
            build_platform_batch(
                &prepared.scenario,
                plan.seed,
                &plan.tenant_id,
                p,
                plan.days,
                prepared.campaign_name(p),
            )
        })
        .collect()
}

fn ensure_tagged(plan: &SeedPlan, batches: &[PlatformBatch]) -> Result<(), ExecError> {
    for b in batches {
        if !plan.tag.campaign_is_tagged(&b.campaign) {
            return Err(ExecError::Invariant(format!(
                "untagged campaign {} generated for {}",
                b.campaign.external_id, b.platform
            )));
        }
        if let Some(m) = b.metrics.iter().find(|m| !plan.tag.metric_is_tagged(m)) {
            return Err(ExecError::Invariant(format!(
                "untagged metric row day {} generated for {}",
                m.day, b.platform
            )));
        }
    }
    Ok(())
}

fn campaign_filter(plan: &SeedPlan, prefix: &str, platform: Platform) -> CampaignFilter {
    CampaignFilter {
        tenant_id: plan.tenant_id.clone(),
        platform: Some(platform),
        is_mock_data: Some(true),
        source_prefix: Some(prefix.to_string()),
    }
}

/// Drop this run's campaigns for platforms whose metrics are already gone.
fn compensate(store: &dyn DataStore, plan: &SeedPlan, prefix: &str, unwritten: &[Platform]) {
    let mut removed = 0u64;
    let result = store.transaction(&mut |tx: &mut dyn Transaction| -> seedkit_io::Result<()> {
        removed = 0;
        for &p in unwritten {
            removed += tx.delete_campaigns(&campaign_filter(plan, prefix, p))?;
        }
        Ok(())
    });
    match result {
        Ok(()) => tracing::warn!(
            platforms = ?unwritten,
            removed_campaigns = removed,
            "removed campaigns left without metrics"
        ),
        Err(e) => tracing::error!(
            platforms = ?unwritten,
            error = %e,
            "compensating campaign delete failed"
        ),
    }
}

fn summary(batches: &[PlatformBatch]) -> String {
    let names: Vec<&str> = batches.iter().map(|b| b.platform.as_str()).collect();
    let rows: usize = batches.iter().map(|b| b.metrics.len()).sum();
    format!(
        "platforms={}, campaigns={}, metric_rows={rows}",
        names.join(","),
        batches.len()
    )
}

pub fn execute(
    store: &dyn DataStore,
    prepared: &PreparedScenario,
    plan: &SeedPlan,
) -> Result<Completed<Vec<PlatformBatch>>, ExecError> {
    let batches = plan_batches(prepared, plan);
    ensure_tagged(plan, &batches)?;

    if plan.dry_run {
        let detail = format!("dry run, planned {}", summary(&batches));
        return Ok(Completed::skipped(batches, detail));
    }

    let prefix = plan.tag.source_prefix().to_string();
    let mut committed = Vec::with_capacity(batches.len());

    for (i, batch) in batches.iter().enumerate() {
        let metric_filter = (i == 0).then(|| MetricFilter {
            tenant_id: plan.tenant_id.clone(),
            is_mock_data: Some(true),
            source_prefix: Some(prefix.clone()),
            platforms: Some(plan.platforms.clone()),
        });
        let campaign_scope = campaign_filter(plan, &prefix, batch.platform);

        let mut deleted = (0u64, 0u64);
        let mut inserted = 0u64;
        let result = store.transaction(&mut |tx: &mut dyn Transaction| -> seedkit_io::Result<()> {
            if let Some(f) = &metric_filter {
                deleted.0 = tx.delete_metrics(f)?;
            }
            deleted.1 = tx.delete_campaigns(&campaign_scope)?;
            tx.create_campaign(&batch.campaign)?;
            inserted = tx.create_metrics(&batch.metrics)?;
            Ok(())
        });

        if let Err(source) = result {
            tracing::error!(
                platform = batch.platform.as_str(),
                committed = committed.len(),
                error = %source,
                "platform write rolled back"
            );
            if !committed.is_empty() {
                let unwritten: Vec<Platform> = batches[i..].iter().map(|b| b.platform).collect();
                compensate(store, plan, &prefix, &unwritten);
            }
            return Err(ExecError::Write {
                platform: batch.platform,
                committed,
                source,
            });
        }

        tracing::debug!(
            platform = batch.platform.as_str(),
            deleted_metrics = deleted.0,
            deleted_campaigns = deleted.1,
            inserted_metrics = inserted,
            "platform committed"
        );
        emit_rows(batch.platform.as_str(), 1, batch.metrics.len());
        committed.push(batch.platform);
    }

    let detail = summary(&batches);
    Ok(Completed::success(batches).with_detail(detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedkit_core::manifest::StepStatus;
    use seedkit_core::provenance::ProvenanceTag;
    use seedkit_core::types::CampaignRow;
    use seedkit_io::{MemoryDataStore, ScenarioLoader, StaticScenarioLoader, StoreCall};

    fn prepared() -> PreparedScenario {
        let scenario = StaticScenarioLoader::builtin()
            .load(&"baseline".into())
            .unwrap()
            .validate()
            .unwrap();
        PreparedScenario {
            scenario,
            campaign_names: None,
        }
    }

    fn plan(platforms: Vec<Platform>, days: u32) -> SeedPlan {
        SeedPlan {
            tenant_id: "t1".into(),
            seed: 42,
            days,
            platforms,
            tag: ProvenanceTag::new(&"baseline".into(), 42),
            dry_run: false,
        }
    }

    #[test]
    fn one_metric_delete_and_scoped_campaign_deletes() {
        let store = MemoryDataStore::new();
        let p = plan(vec![Platform::Google, Platform::Tiktok], 3);
        execute(&store, &prepared(), &p).unwrap();

        let journal = store.journal();
        let metric_deletes: Vec<_> = journal
            .iter()
            .filter_map(|c| match c {
                StoreCall::DeleteMetrics(f) => Some(f),
                _ => None,
            })
            .collect();
        assert_eq!(metric_deletes.len(), 1);
        assert_eq!(
            metric_deletes[0].platforms,
            Some(vec![Platform::Google, Platform::Tiktok])
        );

        let campaign_platforms: Vec<_> = journal
            .iter()
            .filter_map(|c| match c {
                StoreCall::DeleteCampaigns(f) => Some(f.platform),
                _ => None,
            })
            .collect();
        assert_eq!(
            campaign_platforms,
            vec![Some(Platform::Google), Some(Platform::Tiktok)]
        );
        assert_eq!(journal.iter().filter(|c| **c == StoreCall::Commit).count(), 2);
        assert_eq!(store.metrics().len(), 6);
    }

    #[test]
    fn rerun_replaces_rows() {
        let store = MemoryDataStore::new();
        let p = plan(vec![Platform::Google], 5);
        execute(&store, &prepared(), &p).unwrap();
        let first = store.metrics();
        execute(&store, &prepared(), &p).unwrap();
        assert_eq!(store.metrics(), first);
        assert_eq!(store.campaigns().len(), 1);
    }

    #[test]
    fn other_platform_campaigns_survive() {
        let store = MemoryDataStore::new();
        execute(&store, &prepared(), &plan(vec![Platform::Facebook], 2)).unwrap();
        execute(&store, &prepared(), &plan(vec![Platform::Google], 2)).unwrap();
        let platforms: Vec<_> = store.campaigns().iter().map(|c| c.platform).collect();
        assert!(platforms.contains(&Platform::Facebook));
        assert!(platforms.contains(&Platform::Google));
    }

    #[test]
    fn real_rows_are_never_deleted() {
        let store = MemoryDataStore::new();
        store.insert_campaign(CampaignRow {
            tenant_id: "t1".into(),
            platform: Platform::Google,
            external_id: "crm-7".into(),
            name: "Imported".into(),
            source: Some("toolkit:unified:baseline:42:google:campaign".into()),
            is_mock_data: Some(false),
        });
        execute(&store, &prepared(), &plan(vec![Platform::Google], 1)).unwrap();
        assert!(store.campaigns().iter().any(|c| c.external_id == "crm-7"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let store = MemoryDataStore::new();
        let mut p = plan(vec![Platform::Google, Platform::Facebook], 4);
        p.dry_run = true;
        let done = execute(&store, &prepared(), &p).unwrap();
        assert_eq!(done.status, StepStatus::Skipped);
        assert_eq!(done.value.len(), 2);
        assert!(done.detail.unwrap().contains("metric_rows=8"));
        assert!(store.journal().is_empty());
    }

    #[test]
    fn failure_reports_committed_platforms() {
        let store = MemoryDataStore::new();
        store.fail_writes_for(Some(Platform::Facebook));
        let p = plan(vec![Platform::Google, Platform::Facebook], 2);
        match execute(&store, &prepared(), &p).unwrap_err() {
            ExecError::Write {
                platform,
                committed,
                ..
            } => {
                assert_eq!(platform, Platform::Facebook);
                assert_eq!(committed, vec![Platform::Google]);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(store.campaigns().iter().all(|c| c.platform == Platform::Google));
        assert!(store.journal().contains(&StoreCall::Rollback));
    }

    #[test]
    fn failed_rerun_leaves_no_campaign_without_metrics() {
        let store = MemoryDataStore::new();
        let p = plan(vec![Platform::Google, Platform::Facebook], 3);
        execute(&store, &prepared(), &p).unwrap();
        assert_eq!(store.campaigns().len(), 2);
        assert_eq!(store.metrics().len(), 6);

        store.fail_writes_for(Some(Platform::Facebook));
        assert!(matches!(
            execute(&store, &prepared(), &p),
            Err(ExecError::Write { platform: Platform::Facebook, .. })
        ));

        let count = |platform: Platform| {
            (
                store.campaigns().iter().filter(|c| c.platform == platform).count(),
                store.metrics().iter().filter(|m| m.platform == platform).count(),
            )
        };
        assert_eq!(count(Platform::Google), (1, 3));
        assert_eq!(count(Platform::Facebook), (0, 0));
        assert_eq!(store.journal().last(), Some(&StoreCall::Commit));
    }

    #[test]
    fn compensation_covers_every_unwritten_platform() {
        let store = MemoryDataStore::new();
        let p = plan(vec![Platform::Google, Platform::Facebook, Platform::Tiktok], 2);
        execute(&store, &prepared(), &p).unwrap();

        store.fail_writes_for(Some(Platform::Facebook));
        assert!(execute(&store, &prepared(), &p).is_err());

        let platforms: Vec<_> = store.campaigns().iter().map(|c| c.platform).collect();
        assert_eq!(platforms, vec![Platform::Google]);
        assert!(store.metrics().iter().all(|m| m.platform == Platform::Google));
    }

    #[test]
    fn first_platform_failure_needs_no_compensation() {
        let store = MemoryDataStore::new();
        let p = plan(vec![Platform::Facebook, Platform::Google], 2);
        execute(&store, &prepared(), &p).unwrap();
        store.clear_journal();

        store.fail_writes_for(Some(Platform::Facebook));
        assert!(execute(&store, &prepared(), &p).is_err());

        assert_eq!(store.journal().last(), Some(&StoreCall::Rollback));
        assert_eq!(store.campaigns().len(), 2);
        assert_eq!(store.metrics().len(), 4);
    }
}
