//! Seeder configuration that callers can serialize/deserialize or read from env.

use serde::{Deserialize, Serialize};

/// Environment markers under which synthetic writes are permitted.
pub const SAFE_ENVIRONMENTS: &[&str] = &["test", "ci", "demo", "development"];

/// Static facts the safety check inspects before any I/O happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Deployment marker, e.g. `test` or `ci`.
    pub environment: Option<String>,

    /// Set when running under a CI runner (`CI=true`).
    pub ci: bool,

    /// Datastore connection descriptor. Only its presence is checked.
    pub database_url: Option<String>,
}

impl SafetyConfig {
    /// A config that passes the safety check; handy for tests and demos.
    pub fn for_tests() -> Self {
        Self {
            environment: Some("test".into()),
            ci: false,
            database_url: Some("memory://seedkit".into()),
        }
    }

    /// Build from the process environment.
    ///
    /// Environment variables:
    /// - `SEEDKIT_ENV`: deployment marker (`test`, `ci`, `demo`, `development`)
    /// - `CI`: `true`/`1` marks a CI runner
    /// - `DATABASE_URL`: datastore connection descriptor
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("SEEDKIT_ENV") {
            if !s.trim().is_empty() {
                cfg.environment = Some(s.trim().to_string());
            }
        }

        if let Ok(s) = std::env::var("CI") {
            cfg.ci = matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes");
        }

        if let Ok(s) = std::env::var("DATABASE_URL") {
            if !s.trim().is_empty() {
                cfg.database_url = Some(s);
            }
        }

        cfg
    }

    /// Normalized environment marker, if any.
    pub fn environment(&self) -> Option<String> {
        self.environment
            .as_deref()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
    }

    /// True when a non-blank connection descriptor is set.
    pub fn has_database(&self) -> bool {
        self.database_url
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// Redacted connection descriptor for logs: the URL scheme only.
    /// Key/value DSNs have no scheme and yield `None`.
    pub fn database_scheme(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .and_then(|uri| uri.split_once("://"))
            .map(|(scheme, _)| scheme.trim())
            .filter(|s| !s.is_empty())
    }
}

/// Everything a CLI run needs beyond the request itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedkitConfig {
    pub safety: SafetyConfig,

    /// Directory of `<scenario>.yaml` descriptors; `None` uses the built-ins.
    pub scenario_dir: Option<String>,

    /// Directory fixtures are read from; `None` disables fixture enrichment.
    pub fixture_dir: Option<String>,
}

impl SeedkitConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// In addition to the `SafetyConfig` variables:
    /// - `SEEDKIT_SCENARIO_DIR`: scenario descriptor directory
    /// - `SEEDKIT_FIXTURE_DIR`: fixture directory
    pub fn from_env() -> Self {
        let mut cfg = Self {
            safety: SafetyConfig::from_env(),
            ..Self::default()
        };

        if let Ok(s) = std::env::var("SEEDKIT_SCENARIO_DIR") {
            cfg.scenario_dir = Some(s);
        }

        if let Ok(s) = std::env::var("SEEDKIT_FIXTURE_DIR") {
            cfg.fixture_dir = Some(s);
        }

        cfg
    }
}
