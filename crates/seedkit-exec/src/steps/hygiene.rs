//! VALIDATE_INPUT: request shape plus the real-data hygiene gate.
//!
//! A tenant that already holds non-synthetic rows is BLOCKED unless the
//! request carries `allow_real_tenant`. The lookup is a single read; nothing
//! is written here.

use seedkit_core::id::TenantId;
use seedkit_core::provenance::ProvenanceTag;
use seedkit_core::scenario::ValidatedScenario;
use seedkit_core::types::{Platform, SeedRequest};
use seedkit_io::DataStore;

use crate::steps::Completed;
use crate::ExecError;

/// Ten years of daily rows; anything larger is a typo.
pub const MAX_DAYS: u32 = 3660;

/// Everything the writer needs, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub tenant_id: TenantId,
    pub seed: u64,
    pub days: u32,
    pub platforms: Vec<Platform>,
    pub tag: ProvenanceTag,
    pub dry_run: bool,
}

pub fn check(
    store: &dyn DataStore,
    request: &SeedRequest,
    scenario: &ValidatedScenario,
) -> Result<Completed<SeedPlan>, ExecError> {
    if request.tenant_id.is_blank() {
        return Err(ExecError::Request("tenant id is blank".into()));
    }

    let days = request.days.unwrap_or(scenario.default_days);
    if days == 0 || days > MAX_DAYS {
        return Err(ExecError::Request(format!(
            "days must be between 1 and {MAX_DAYS}, got {days}"
        )));
    }

    let platforms = request.selected_platforms();
    if platforms.is_empty() {
        return Err(ExecError::Request("no platforms selected".into()));
    }

    let plan = SeedPlan {
        tenant_id: request.tenant_id.clone(),
        seed: request.seed,
        days,
        platforms,
        tag: ProvenanceTag::new(&scenario.id, request.seed),
        dry_run: request.dry_run,
    };

    let detail = match store.find_first_real(&request.tenant_id)? {
        None => format!("days={days}, platforms={}", plan.platforms.len()),
        Some(found) if request.allow_real_tenant => {
            tracing::warn!(
                tenant = %request.tenant_id,
                table = found.table.as_str(),
                key = %found.key,
                "tenant holds real data; continuing because allow_real_tenant is set"
            );
            format!(
                "days={days}, platforms={}, real data override ({} {})",
                plan.platforms.len(),
                found.table.as_str(),
                found.key
            )
        }
        Some(found) => {
            return Err(ExecError::RealTenantData {
                tenant: request.tenant_id.to_string(),
                table: found.table,
                key: found.key,
            })
        }
    };

    Ok(Completed::success(plan).with_detail(detail))
}
