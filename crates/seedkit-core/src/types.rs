//! Request and row types shared by the generator, the store, and the runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::{ScenarioId, TenantId};

/// Ad platforms the seeder knows how to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Google,
    Facebook,
    Tiktok,
    Linkedin,
}

impl Platform {
    /// Every supported platform, in canonical order. An absent platform list
    /// on a request expands to this.
    pub const ALL: [Platform; 4] = [
        Platform::Google,
        Platform::Facebook,
        Platform::Tiktok,
        Platform::Linkedin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Google => "google",
            Platform::Facebook => "facebook",
            Platform::Tiktok => "tiktok",
            Platform::Linkedin => "linkedin",
        }
    }

    /// Parse a comma-separated list such as `"google, facebook"`.
    ///
    /// Blank entries are ignored and duplicates collapse onto their first
    /// occurrence, so the result preserves caller order.
    pub fn parse_list(s: &str) -> Result<Vec<Platform>> {
        let mut out: Vec<Platform> = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let p: Platform = part.parse()?;
            if !out.contains(&p) {
                out.push(p);
            }
        }
        if out.is_empty() {
            return Err(Error::Request("platform list is empty".into()));
        }
        Ok(out)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Platform::Google),
            "facebook" | "meta" => Ok(Platform::Facebook),
            "tiktok" => Ok(Platform::Tiktok),
            "linkedin" => Ok(Platform::Linkedin),
            other => Err(Error::UnknownPlatform(other.to_string())),
        }
    }
}

/// One seeding invocation. Built by the caller, discarded after the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRequest {
    pub tenant_id: TenantId,
    pub scenario_id: ScenarioId,
    pub seed: u64,
    /// Number of days to generate; `None` falls back to the scenario default.
    pub days: Option<u32>,
    pub dry_run: bool,
    pub allow_real_tenant: bool,
    /// Selected platforms; `None` means every supported platform.
    pub platforms: Option<Vec<Platform>>,
}

impl SeedRequest {
    pub fn new(tenant_id: impl Into<TenantId>, scenario_id: impl Into<ScenarioId>, seed: u64) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            scenario_id: scenario_id.into(),
            seed,
            days: None,
            dry_run: false,
            allow_real_tenant: false,
            platforms: None,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    pub fn allow_real_tenant(mut self, yes: bool) -> Self {
        self.allow_real_tenant = yes;
        self
    }

    /// The platform set this request resolves to, de-duplicated, in request order.
    pub fn selected_platforms(&self) -> Vec<Platform> {
        match &self.platforms {
            Some(list) => {
                let mut out = Vec::with_capacity(list.len());
                for p in list {
                    if !out.contains(p) {
                        out.push(*p);
                    }
                }
                out
            }
            None => Platform::ALL.to_vec(),
        }
    }
}

/// A campaign row as persisted by the store.
///
/// `is_mock_data` is optional because rows written by other writers may
/// predate the column; an absent flag counts as real data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRow {
    pub tenant_id: TenantId,
    pub platform: Platform,
    pub external_id: String,
    pub name: String,
    pub source: Option<String>,
    pub is_mock_data: Option<bool>,
}

/// One day of metrics for one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub tenant_id: TenantId,
    pub platform: Platform,
    pub campaign_external_id: String,
    /// 1-based day index within the generated window.
    pub day: u32,
    pub impressions: u64,
    pub clicks: u64,
    pub cost_cents: u64,
    pub conversions: u64,
    pub source: Option<String>,
    pub is_mock_data: Option<bool>,
}

/// Generated rows for a single platform, ready to hand to the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBatch {
    pub platform: Platform,
    pub campaign: CampaignRow,
    pub metrics: Vec<MetricRow>,
}
