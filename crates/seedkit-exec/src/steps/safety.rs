//! SAFETY_CHECK: static environment gate. No collaborator I/O.

use seedkit_core::config::{SafetyConfig, SAFE_ENVIRONMENTS};

use crate::steps::Completed;
use crate::ExecError;

pub fn check(cfg: &SafetyConfig) -> Result<Completed<()>, ExecError> {
    let env = cfg.environment();

    if env.as_deref() == Some("production") {
        return Err(ExecError::UnsafeEnvironment(
            "SEEDKIT_ENV=production never accepts synthetic writes".into(),
        ));
    }

    let marked_safe = cfg.ci || env.as_deref().is_some_and(|e| SAFE_ENVIRONMENTS.contains(&e));
    if !marked_safe {
        return Err(ExecError::UnsafeEnvironment(format!(
            "no safe-environment marker (set SEEDKIT_ENV to one of {} or CI=true); found {}",
            SAFE_ENVIRONMENTS.join("/"),
            env.as_deref().unwrap_or("<unset>")
        )));
    }

    if !cfg.has_database() {
        return Err(ExecError::UnsafeEnvironment(
            "datastore connection (DATABASE_URL) is not configured".into(),
        ));
    }
    let scheme = cfg.database_scheme().unwrap_or("<configured>");

    let marker = env.unwrap_or_else(|| "ci".to_string());
    Ok(Completed::success(()).with_detail(format!("env={marker}, store={scheme}")))
}
