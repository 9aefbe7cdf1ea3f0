//! Abstract datastore interface and the predicates it is queried with.
//!
//! Every destructive call takes an explicit filter value. In particular the
//! campaign delete carries its platform as a field: a multi-platform run must
//! never let one platform's cleanup reach another platform's campaigns, and
//! that scoping is not something a store may infer from call order.

use serde::{Deserialize, Serialize};

use seedkit_core::id::TenantId;
use seedkit_core::provenance::source_in_scope;
use seedkit_core::types::{CampaignRow, MetricRow, Platform};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Campaigns,
    Metrics,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Campaigns => "campaigns",
            Table::Metrics => "metrics",
        }
    }
}

/// Columns the pipeline reads and writes; the verify step checks the store
/// still exposes them.
pub const PROVENANCE_COLUMNS: &[&str] = &["tenant_id", "platform", "source", "is_mock_data"];

/// First non-synthetic record found for a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealRecord {
    pub table: Table,
    /// Human-readable key (external id, or campaign/day for metrics).
    pub key: String,
}

/// Metric predicate. `None` fields do not constrain.
///
/// `source_prefix` matches on a `:` boundary (see
/// `seedkit_core::provenance::source_in_scope`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFilter {
    pub tenant_id: TenantId,
    pub is_mock_data: Option<bool>,
    pub source_prefix: Option<String>,
    pub platforms: Option<Vec<Platform>>,
}

impl MetricFilter {
    pub fn tenant(tenant_id: &TenantId) -> Self {
        Self {
            tenant_id: tenant_id.clone(),
            is_mock_data: None,
            source_prefix: None,
            platforms: None,
        }
    }

    pub fn matches(&self, row: &MetricRow) -> bool {
        row.tenant_id == self.tenant_id
            && self.is_mock_data.map_or(true, |m| row.is_mock_data == Some(m))
            && self
                .source_prefix
                .as_deref()
                .map_or(true, |p| row.source.as_deref().is_some_and(|s| source_in_scope(p, s)))
            && self
                .platforms
                .as_ref()
                .map_or(true, |ps| ps.contains(&row.platform))
    }
}

/// Campaign predicate. `None` fields do not constrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFilter {
    pub tenant_id: TenantId,
    pub platform: Option<Platform>,
    pub is_mock_data: Option<bool>,
    pub source_prefix: Option<String>,
}

impl CampaignFilter {
    pub fn tenant(tenant_id: &TenantId) -> Self {
        Self {
            tenant_id: tenant_id.clone(),
            platform: None,
            is_mock_data: None,
            source_prefix: None,
        }
    }

    pub fn matches(&self, row: &CampaignRow) -> bool {
        row.tenant_id == self.tenant_id
            && self.platform.map_or(true, |p| row.platform == p)
            && self.is_mock_data.map_or(true, |m| row.is_mock_data == Some(m))
            && self
                .source_prefix
                .as_deref()
                .map_or(true, |p| row.source.as_deref().is_some_and(|s| source_in_scope(p, s)))
    }
}

/// Writes available inside a transaction. Nothing is visible to readers until
/// the enclosing `DataStore::transaction` call returns `Ok`.
pub trait Transaction {
    /// `deleteMany` on metrics. Returns the number of rows removed.
    fn delete_metrics(&mut self, filter: &MetricFilter) -> Result<u64>;

    /// `deleteMany` on campaigns. Returns the number of rows removed.
    fn delete_campaigns(&mut self, filter: &CampaignFilter) -> Result<u64>;

    /// `create` a single campaign. Fails on a duplicate `(tenant, external_id)`.
    fn create_campaign(&mut self, row: &CampaignRow) -> Result<()>;

    /// `createMany` on metrics. Returns the number of rows inserted.
    fn create_metrics(&mut self, rows: &[MetricRow]) -> Result<u64>;
}

/// Transactional store of campaign and metric rows.
///
/// Implemented by `MemoryDataStore`; a SQL-backed store implements the same
/// surface on top of its client's transactions.
pub trait DataStore: Send + Sync {
    /// `findFirst` record of the tenant whose `is_mock_data` is false or absent.
    fn find_first_real(&self, tenant_id: &TenantId) -> Result<Option<RealRecord>>;

    fn find_campaigns(&self, filter: &CampaignFilter) -> Result<Vec<CampaignRow>>;

    fn find_metrics(&self, filter: &MetricFilter) -> Result<Vec<MetricRow>>;

    /// Raw schema introspection: the column names of `table`.
    fn column_names(&self, table: Table) -> Result<Vec<String>>;

    /// Run `work` atomically: committed if it returns `Ok`, discarded otherwise.
    /// `work` must not call back into the store.
    fn transaction(&self, work: &mut dyn FnMut(&mut dyn Transaction) -> Result<()>) -> Result<()>;
}
