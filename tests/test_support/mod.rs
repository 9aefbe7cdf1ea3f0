//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use seedkit_core::prelude::{CampaignRow, MetricRow, Platform, SafetyConfig};
use seedkit_exec::Seeder;
use seedkit_io::{MemoryDataStore, ScenarioLoader, StaticScenarioLoader, StoreCall};

/// Fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("seedkit-tests-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn seeder_with(store: &MemoryDataStore, loader: impl ScenarioLoader + 'static) -> Seeder {
    Seeder::new(
        SafetyConfig::for_tests(),
        Arc::new(loader),
        Arc::new(store.clone()),
    )
}

pub fn builtin_seeder(store: &MemoryDataStore) -> Seeder {
    seeder_with(store, StaticScenarioLoader::builtin())
}

pub fn created_metrics(journal: &[StoreCall]) -> Vec<Vec<MetricRow>> {
    journal
        .iter()
        .filter_map(|c| match c {
            StoreCall::CreateMetrics(rows) => Some(rows.clone()),
            _ => None,
        })
        .collect()
}

pub fn created_campaigns(journal: &[StoreCall]) -> Vec<CampaignRow> {
    journal
        .iter()
        .filter_map(|c| match c {
            StoreCall::CreateCampaign(row) => Some(row.clone()),
            _ => None,
        })
        .collect()
}

/// A row another writer put there: no provenance, no mock flag.
pub fn real_campaign(tenant: &str) -> CampaignRow {
    CampaignRow {
        tenant_id: tenant.into(),
        platform: Platform::Google,
        external_id: "crm-00017".into(),
        name: "Imported from CRM".into(),
        source: None,
        is_mock_data: None,
    }
}

pub fn real_metric(tenant: &str) -> MetricRow {
    MetricRow {
        tenant_id: tenant.into(),
        platform: Platform::Facebook,
        campaign_external_id: "crm-00018".into(),
        day: 1,
        impressions: 900,
        clicks: 12,
        cost_cents: 4_500,
        conversions: 1,
        source: Some("facebook-sync".into()),
        is_mock_data: Some(false),
    }
}
