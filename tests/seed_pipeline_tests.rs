//! End-to-end runs of the seeding pipeline against the in-memory store.

mod test_support;

use seedkit_core::manifest::{RunStatus, StepName, StepStatus};
use seedkit_core::types::{Platform, SeedRequest};
use seedkit_io::store::Table;
use seedkit_io::{MemoryDataStore, StoreCall};
use test_support::{builtin_seeder, created_campaigns, created_metrics, real_campaign, real_metric};

fn google_only(seed: u64) -> SeedRequest {
    SeedRequest::new("t1", "baseline", seed)
        .with_days(1)
        .with_platforms(vec![Platform::Google])
}

#[test]
fn test_real_tenant_is_blocked_before_any_write() {
    let store = MemoryDataStore::new();
    store.insert_campaign(real_campaign("t1"));

    let out = builtin_seeder(&store).run(&SeedRequest::new("t1", "baseline", 1));

    assert_eq!(out.status, RunStatus::Blocked);
    assert_eq!(out.exit_code, 78);
    let step = out.manifest.step(StepName::ValidateInput).unwrap();
    assert_eq!(step.status, StepStatus::Failed);
    assert!(step.error.as_deref().unwrap().contains("crm-00017"));
    assert!(out.manifest.step(StepName::Execute).is_none());
    assert!(out.manifest.step(StepName::Verify).is_none());
    assert_eq!(store.journal(), vec![StoreCall::FindFirstReal("t1".into())]);
}

#[test]
fn test_real_metric_rows_also_block() {
    let store = MemoryDataStore::new();
    store.insert_metric(real_metric("t1"));
    let out = builtin_seeder(&store).run(&SeedRequest::new("t1", "baseline", 1));
    assert_eq!(out.status, RunStatus::Blocked);
}

#[test]
fn test_override_seeds_alongside_real_data() {
    let store = MemoryDataStore::new();
    store.insert_campaign(real_campaign("t1"));

    let req = google_only(4).allow_real_tenant(true);
    let out = builtin_seeder(&store).run(&req);

    assert_eq!(out.status, RunStatus::Success);
    let campaigns = store.campaigns();
    assert!(campaigns.iter().any(|c| c.external_id == "crm-00017"));
    assert_eq!(campaigns.len(), 2);
}

#[test]
fn test_same_inputs_produce_identical_payloads() {
    let a = MemoryDataStore::new();
    let b = MemoryDataStore::new();
    let out_a = builtin_seeder(&a).run(&google_only(999));
    let out_b = builtin_seeder(&b).run(&google_only(999));

    assert_eq!(out_a.status, RunStatus::Success);
    let payload_a = created_metrics(&a.journal());
    assert_eq!(payload_a.len(), 1);
    assert_eq!(payload_a, created_metrics(&b.journal()));
    assert_eq!(out_a.manifest.payload_digest, out_b.manifest.payload_digest);
}

#[test]
fn test_platform_subset_does_not_change_google_rows() {
    let solo = MemoryDataStore::new();
    let pair = MemoryDataStore::new();
    builtin_seeder(&solo).run(&SeedRequest::new("t1", "baseline", 555).with_platforms(vec![Platform::Google]));
    builtin_seeder(&pair).run(
        &SeedRequest::new("t1", "baseline", 555)
            .with_platforms(vec![Platform::Google, Platform::Facebook]),
    );

    let google = |store: &MemoryDataStore| {
        let mut rows = store.metrics();
        rows.retain(|m| m.platform == Platform::Google);
        rows
    };
    let solo_rows = google(&solo);
    assert_eq!(solo_rows.len(), 30);
    assert_eq!(solo_rows, google(&pair));

    let solo_campaign = created_campaigns(&solo.journal());
    let pair_campaigns = created_campaigns(&pair.journal());
    assert_eq!(solo_campaign[0], pair_campaigns[0]);
}

#[test]
fn test_one_metric_delete_per_run_and_platform_scoped_campaign_deletes() {
    let store = MemoryDataStore::new();
    let platforms = vec![Platform::Google, Platform::Facebook, Platform::Linkedin];
    let out = builtin_seeder(&store).run(
        &SeedRequest::new("t1", "growth", 8)
            .with_days(5)
            .with_platforms(platforms.clone()),
    );
    assert_eq!(out.status, RunStatus::Success);

    let journal = store.journal();
    let metric_deletes: Vec<_> = journal
        .iter()
        .filter(|c| matches!(c, StoreCall::DeleteMetrics(_)))
        .collect();
    assert_eq!(metric_deletes.len(), 1);

    let campaign_scopes: Vec<Option<Platform>> = journal
        .iter()
        .filter_map(|c| match c {
            StoreCall::DeleteCampaigns(f) => {
                assert_eq!(f.is_mock_data, Some(true));
                assert_eq!(f.source_prefix.as_deref(), Some("toolkit:unified:growth:8"));
                Some(f.platform)
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        campaign_scopes,
        platforms.iter().copied().map(Some).collect::<Vec<_>>()
    );
}

#[test]
fn test_rerun_is_idempotent() {
    let store = MemoryDataStore::new();
    let req = SeedRequest::new("t1", "seasonal", 21).with_days(14);
    builtin_seeder(&store).run(&req);
    let campaigns = store.campaigns();
    let metrics = store.metrics();

    let again = builtin_seeder(&store).run(&req);
    assert_eq!(again.status, RunStatus::Success);
    assert_eq!(store.campaigns(), campaigns);
    assert_eq!(store.metrics(), metrics);
    assert_eq!(metrics.len(), 14 * Platform::ALL.len());
}

#[test]
fn test_single_day_gives_one_row_per_platform() {
    let store = MemoryDataStore::new();
    let out = builtin_seeder(&store).run(&SeedRequest::new("t1", "decline", 3).with_days(1));
    assert_eq!(out.status, RunStatus::Success);

    let metrics = store.metrics();
    assert_eq!(metrics.len(), Platform::ALL.len());
    for p in Platform::ALL {
        let rows: Vec<_> = metrics.iter().filter(|m| m.platform == p).collect();
        assert_eq!(rows.len(), 1, "{p}");
        assert_eq!(rows[0].day, 1);
    }
}

#[test]
fn test_every_written_row_carries_provenance() {
    let store = MemoryDataStore::new();
    builtin_seeder(&store).run(&SeedRequest::new("t1", "baseline", 999).with_days(3));

    for c in store.campaigns() {
        assert_eq!(c.is_mock_data, Some(true));
        assert!(c
            .source
            .as_deref()
            .unwrap()
            .starts_with("toolkit:unified:baseline:999:"));
    }
    for m in store.metrics() {
        assert_eq!(m.is_mock_data, Some(true));
        assert!(m
            .source
            .as_deref()
            .unwrap()
            .starts_with("toolkit:unified:baseline:999:"));
    }
}

#[test]
fn test_external_ids_are_derived_not_timestamped() {
    let store = MemoryDataStore::new();
    builtin_seeder(&store).run(&SeedRequest::new("t1", "baseline", 999).with_days(2));

    for c in store.campaigns() {
        assert!(c.external_id.starts_with("unified-baseline-999-"));
        assert_eq!(c.external_id, format!("unified-baseline-999-{}-0", c.platform));
        let longest_digit_run = c
            .external_id
            .split(|ch: char| !ch.is_ascii_digit())
            .map(str::len)
            .max()
            .unwrap_or(0);
        assert!(longest_digit_run < 13, "{}", c.external_id);
    }
}

#[test]
fn test_seed_prefixes_do_not_collide() {
    let store = MemoryDataStore::new();
    builtin_seeder(&store).run(&google_only(999));
    builtin_seeder(&store).run(&google_only(9990));

    let ids: Vec<_> = store.campaigns().into_iter().map(|c| c.external_id).collect();
    assert_eq!(
        ids,
        vec![
            "unified-baseline-999-google-0".to_string(),
            "unified-baseline-9990-google-0".to_string()
        ]
    );
    assert_eq!(store.metrics().len(), 2);
}

#[test]
fn test_manifest_json_contract() {
    let store = MemoryDataStore::new();
    let out = builtin_seeder(&store).run(&google_only(7));
    let v = serde_json::to_value(&out).unwrap();

    assert_eq!(v["status"], "SUCCESS");
    assert_eq!(v["exitCode"], 0);
    assert_eq!(v["manifest"]["invocation"]["commandName"], "seed-unified-scenario");
    assert_eq!(v["manifest"]["invocation"]["commandClassification"], "WRITE");
    let names: Vec<_> = v["manifest"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "SAFETY_CHECK",
            "LOAD_SCENARIO",
            "VALIDATE_SCENARIO",
            "VALIDATE_INPUT",
            "EXECUTE",
            "VERIFY"
        ]
    );
}

#[test]
fn test_dry_run_reads_but_never_writes() {
    let store = MemoryDataStore::new();
    let out = builtin_seeder(&store).run(&SeedRequest::new("t1", "baseline", 2).dry_run(true));

    assert_eq!(out.status, RunStatus::Success);
    let execute = out.manifest.step(StepName::Execute).unwrap();
    assert_eq!(execute.status, StepStatus::Skipped);
    assert!(execute.detail.as_deref().unwrap().contains("metric_rows=120"));
    assert_eq!(
        out.manifest.step(StepName::Verify).unwrap().status,
        StepStatus::Skipped
    );
    assert!(out.manifest.payload_digest.is_some());
    assert_eq!(store.journal(), vec![StoreCall::FindFirstReal("t1".into())]);
}

#[test]
fn test_dry_run_still_blocks_on_real_data() {
    let store = MemoryDataStore::new();
    store.insert_campaign(real_campaign("t1"));
    let out = builtin_seeder(&store).run(&SeedRequest::new("t1", "baseline", 2).dry_run(true));
    assert_eq!(out.status, RunStatus::Blocked);
}

#[test]
fn test_partial_failure_keeps_committed_platforms() {
    let store = MemoryDataStore::new();
    store.fail_writes_for(Some(Platform::Facebook));

    let out = builtin_seeder(&store).run(
        &SeedRequest::new("t1", "baseline", 5)
            .with_days(2)
            .with_platforms(vec![Platform::Google, Platform::Facebook, Platform::Tiktok]),
    );

    assert_eq!(out.status, RunStatus::Failed);
    assert_eq!(out.exit_code, 1);
    let execute = out.manifest.step(StepName::Execute).unwrap();
    assert_eq!(execute.status, StepStatus::Failed);
    assert!(execute
        .error
        .as_deref()
        .unwrap()
        .contains("already committed: google"));
    assert!(out.manifest.step(StepName::Verify).is_none());

    let platforms: Vec<_> = store.campaigns().iter().map(|c| c.platform).collect();
    assert_eq!(platforms, vec![Platform::Google]);
    assert_eq!(store.metrics().len(), 2);
}

#[test]
fn test_failed_rerun_leaves_no_orphan_campaign() {
    let store = MemoryDataStore::new();
    let request = SeedRequest::new("t1", "baseline", 8)
        .with_days(3)
        .with_platforms(vec![Platform::Google, Platform::Facebook]);
    assert_eq!(builtin_seeder(&store).run(&request).status, RunStatus::Success);

    store.fail_writes_for(Some(Platform::Facebook));
    let out = builtin_seeder(&store).run(&request);
    assert_eq!(out.status, RunStatus::Failed);

    let campaigns = |p: Platform| store.campaigns().iter().filter(|c| c.platform == p).count();
    let metrics = |p: Platform| store.metrics().iter().filter(|m| m.platform == p).count();
    assert_eq!((campaigns(Platform::Google), metrics(Platform::Google)), (1, 3));
    assert_eq!((campaigns(Platform::Facebook), metrics(Platform::Facebook)), (0, 0));
}

#[test]
fn test_verify_failure_leaves_rows_in_place() {
    let store = MemoryDataStore::new();
    store.drop_column(Table::Campaigns, "source");

    let out = builtin_seeder(&store).run(&google_only(12));

    assert_eq!(out.status, RunStatus::Failed);
    assert_eq!(
        out.manifest.step(StepName::Execute).unwrap().status,
        StepStatus::Success
    );
    let verify = out.manifest.step(StepName::Verify).unwrap();
    assert_eq!(verify.status, StepStatus::Failed);
    assert!(verify.error.as_deref().unwrap().contains("source"));
    assert_eq!(store.campaigns().len(), 1);
}

#[test]
fn test_unknown_scenario_fails_at_load() {
    let store = MemoryDataStore::new();
    let out = builtin_seeder(&store).run(&SeedRequest::new("t1", "no-such-scenario", 1));

    assert_eq!(out.status, RunStatus::Failed);
    assert_eq!(
        out.manifest.step_names(),
        vec![StepName::SafetyCheck, StepName::LoadScenario]
    );
    assert!(store.journal().is_empty());
}
