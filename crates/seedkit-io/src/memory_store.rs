//! In-memory datastore backend.
//!
//! Rows live in two vectors behind a mutex. A transaction works on a staged
//! copy and swaps it in on commit, so a failed transaction leaves no trace.
//! Every call is appended to a journal that tests (and `--dry-run` style
//! inspection) can read back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use seedkit_core::id::TenantId;
use seedkit_core::types::{CampaignRow, MetricRow, Platform};

use crate::error::{Error, Result};
use crate::store::{CampaignFilter, DataStore, MetricFilter, RealRecord, Table, Transaction};

/// One observed call against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    FindFirstReal(TenantId),
    DeleteMetrics(MetricFilter),
    DeleteCampaigns(CampaignFilter),
    CreateCampaign(CampaignRow),
    CreateMetrics(Vec<MetricRow>),
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    campaigns: Vec<CampaignRow>,
    metrics: Vec<MetricRow>,
}

#[derive(Debug)]
struct Inner {
    tables: Tables,
    journal: Vec<StoreCall>,
    columns: HashMap<Table, Vec<String>>,
    fail_writes_for: Option<Platform>,
}

fn default_columns() -> HashMap<Table, Vec<String>> {
    let campaigns = [
        "id",
        "tenant_id",
        "platform",
        "external_id",
        "name",
        "source",
        "is_mock_data",
    ];
    let metrics = [
        "id",
        "tenant_id",
        "platform",
        "campaign_external_id",
        "day",
        "impressions",
        "clicks",
        "cost_cents",
        "conversions",
        "source",
        "is_mock_data",
    ];
    HashMap::from([
        (Table::Campaigns, campaigns.iter().map(|s| s.to_string()).collect()),
        (Table::Metrics, metrics.iter().map(|s| s.to_string()).collect()),
    ])
}

/// Thread-safe in-memory store.
#[derive(Clone)]
pub struct MemoryDataStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                tables: Tables::default(),
                journal: Vec::new(),
                columns: default_columns(),
                fail_writes_for: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a campaign directly, bypassing transactions and the journal
    /// (used to stage pre-existing tenant data).
    pub fn insert_campaign(&self, row: CampaignRow) {
        self.lock().tables.campaigns.push(row);
    }

    /// Insert a metric row directly, bypassing transactions and the journal.
    pub fn insert_metric(&self, row: MetricRow) {
        self.lock().tables.metrics.push(row);
    }

    pub fn campaigns(&self) -> Vec<CampaignRow> {
        self.lock().tables.campaigns.clone()
    }

    pub fn metrics(&self) -> Vec<MetricRow> {
        self.lock().tables.metrics.clone()
    }

    pub fn journal(&self) -> Vec<StoreCall> {
        self.lock().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    /// Make every insert for `platform` fail until cleared.
    pub fn fail_writes_for(&self, platform: Option<Platform>) {
        self.lock().fail_writes_for = platform;
    }

    /// Remove a column from introspection results (simulates schema drift).
    pub fn drop_column(&self, table: Table, column: &str) {
        if let Some(cols) = self.lock().columns.get_mut(&table) {
            cols.retain(|c| c != column);
        }
    }
}

impl Default for MemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

struct MemoryTx {
    staged: Tables,
    calls: Vec<StoreCall>,
    fail_writes_for: Option<Platform>,
}

impl MemoryTx {
    fn check_injected(&self, platform: Platform) -> Result<()> {
        if self.fail_writes_for == Some(platform) {
            return Err(Error::Store(format!("injected write failure for {platform}")));
        }
        Ok(())
    }
}

impl Transaction for MemoryTx {
    fn delete_metrics(&mut self, filter: &MetricFilter) -> Result<u64> {
        self.calls.push(StoreCall::DeleteMetrics(filter.clone()));
        let before = self.staged.metrics.len();
        self.staged.metrics.retain(|m| !filter.matches(m));
        Ok((before - self.staged.metrics.len()) as u64)
    }

    fn delete_campaigns(&mut self, filter: &CampaignFilter) -> Result<u64> {
        self.calls.push(StoreCall::DeleteCampaigns(filter.clone()));
        let before = self.staged.campaigns.len();
        self.staged.campaigns.retain(|c| !filter.matches(c));
        Ok((before - self.staged.campaigns.len()) as u64)
    }

    fn create_campaign(&mut self, row: &CampaignRow) -> Result<()> {
        self.calls.push(StoreCall::CreateCampaign(row.clone()));
        self.check_injected(row.platform)?;
        let dup = self
            .staged
            .campaigns
            .iter()
            .any(|c| c.tenant_id == row.tenant_id && c.external_id == row.external_id);
        if dup {
            return Err(Error::Conflict(format!(
                "campaign ({}, {}) already exists",
                row.tenant_id, row.external_id
            )));
        }
        self.staged.campaigns.push(row.clone());
        Ok(())
    }

    fn create_metrics(&mut self, rows: &[MetricRow]) -> Result<u64> {
        self.calls.push(StoreCall::CreateMetrics(rows.to_vec()));
        for r in rows {
            self.check_injected(r.platform)?;
        }
        self.staged.metrics.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }
}

impl DataStore for MemoryDataStore {
    fn find_first_real(&self, tenant_id: &TenantId) -> Result<Option<RealRecord>> {
        let mut inner = self.lock();
        inner.journal.push(StoreCall::FindFirstReal(tenant_id.clone()));

        let campaign = inner
            .tables
            .campaigns
            .iter()
            .find(|c| &c.tenant_id == tenant_id && c.is_mock_data != Some(true))
            .map(|c| RealRecord {
                table: Table::Campaigns,
                key: c.external_id.clone(),
            });
        if campaign.is_some() {
            return Ok(campaign);
        }

        Ok(inner
            .tables
            .metrics
            .iter()
            .find(|m| &m.tenant_id == tenant_id && m.is_mock_data != Some(true))
            .map(|m| RealRecord {
                table: Table::Metrics,
                key: format!("{}#d{}", m.campaign_external_id, m.day),
            }))
    }

    fn find_campaigns(&self, filter: &CampaignFilter) -> Result<Vec<CampaignRow>> {
        let inner = self.lock();
        Ok(inner
            .tables
            .campaigns
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    fn find_metrics(&self, filter: &MetricFilter) -> Result<Vec<MetricRow>> {
        let inner = self.lock();
        Ok(inner
            .tables
            .metrics
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    fn column_names(&self, table: Table) -> Result<Vec<String>> {
        let inner = self.lock();
        inner
            .columns
            .get(&table)
            .cloned()
            .ok_or_else(|| Error::Store(format!("unknown table '{}'", table.as_str())))
    }

    fn transaction(&self, work: &mut dyn FnMut(&mut dyn Transaction) -> Result<()>) -> Result<()> {
        // Held for the whole transaction: serializable, and `work` cannot
        // reach the store anyway.
        let mut inner = self.lock();
        let mut tx = MemoryTx {
            staged: inner.tables.clone(),
            calls: Vec::new(),
            fail_writes_for: inner.fail_writes_for,
        };

        let result = work(&mut tx);
        inner.journal.append(&mut tx.calls);
        match result {
            Ok(()) => {
                inner.tables = tx.staged;
                inner.journal.push(StoreCall::Commit);
                Ok(())
            }
            Err(e) => {
                inner.journal.push(StoreCall::Rollback);
                Err(e)
            }
        }
    }
}
