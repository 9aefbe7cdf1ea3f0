//! Scenario sources.
//!
//! Loaders only resolve an id to a `ScenarioDescriptor`; they do not judge
//! it. Shape checks happen in a separate pipeline step so a missing scenario
//! and a malformed one show up as different manifest failures.
//!
//! YAML example (`scenarios/baseline.yaml`):
//! ```yaml
//! schema_version: "1"
//! id: baseline
//! name: Baseline
//! trend: STABLE
//! base_impressions: 12000
//! default_days: 30
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use seedkit_core::id::ScenarioId;
use seedkit_core::scenario::ScenarioDescriptor;

use crate::error::{Error, Result};

pub trait ScenarioLoader: Send + Sync {
    /// Resolve `id`. Unknown ids yield `Error::ScenarioNotFound`.
    fn load(&self, id: &ScenarioId) -> Result<ScenarioDescriptor>;

    /// Ids this loader can resolve, sorted.
    fn list(&self) -> Result<Vec<ScenarioId>>;
}

static BUILTIN_SCENARIOS: Lazy<Vec<ScenarioDescriptor>> = Lazy::new(|| {
    let mk = |id: &str, name: &str, trend: &str, base: i64, days: i64| ScenarioDescriptor {
        schema_version: "1".into(),
        id: ScenarioId::new(id),
        name: name.into(),
        trend: trend.into(),
        base_impressions: base,
        default_days: days,
        fixture: None,
    };
    vec![
        mk("baseline", "Baseline", "STABLE", 12_000, 30),
        mk("growth", "Growth Quarter", "GROWTH", 8_000, 90),
        mk("decline", "Declining Spend", "DECLINE", 15_000, 60),
        mk("seasonal", "Weekly Seasonality", "SEASONAL", 10_000, 28),
    ]
});

/// In-memory scenario table.
#[derive(Debug, Clone, Default)]
pub struct StaticScenarioLoader {
    scenarios: BTreeMap<ScenarioId, ScenarioDescriptor>,
}

impl StaticScenarioLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader pre-populated with the built-in scenarios.
    pub fn builtin() -> Self {
        let mut loader = Self::new();
        for s in BUILTIN_SCENARIOS.iter() {
            loader.insert(s.clone());
        }
        loader
    }

    pub fn insert(&mut self, descriptor: ScenarioDescriptor) {
        self.scenarios.insert(descriptor.id.clone(), descriptor);
    }

    pub fn with(mut self, descriptor: ScenarioDescriptor) -> Self {
        self.insert(descriptor);
        self
    }
}

impl ScenarioLoader for StaticScenarioLoader {
    fn load(&self, id: &ScenarioId) -> Result<ScenarioDescriptor> {
        self.scenarios
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ScenarioNotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<ScenarioId>> {
        Ok(self.scenarios.keys().cloned().collect())
    }
}

/// Reads `<dir>/<id>.yaml` (or `.yml`).
#[derive(Debug, Clone)]
pub struct YamlScenarioLoader {
    dir: PathBuf,
}

impl YamlScenarioLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &ScenarioId) -> Option<PathBuf> {
        // Ids are joined into a path; refuse anything that could escape `dir`.
        let s = id.as_str();
        if s.is_empty() || s.contains(['/', '\\']) || s.starts_with('.') {
            return None;
        }
        ["yaml", "yml"]
            .iter()
            .map(|ext| self.dir.join(format!("{s}.{ext}")))
            .find(|p| p.is_file())
    }
}

pub fn parse_yaml_scenario(src: &str) -> Result<ScenarioDescriptor> {
    serde_yaml::from_str(src).map_err(|e| Error::ScenarioParse(e.to_string()))
}

impl ScenarioLoader for YamlScenarioLoader {
    fn load(&self, id: &ScenarioId) -> Result<ScenarioDescriptor> {
        let path = self
            .path_for(id)
            .ok_or_else(|| Error::ScenarioNotFound(id.to_string()))?;
        let src = fs::read_to_string(&path)?;
        let descriptor = parse_yaml_scenario(&src)?;
        if &descriptor.id != id {
            return Err(Error::ScenarioParse(format!(
                "{} declares id '{}', expected '{}'",
                path.display(),
                descriptor.id,
                id
            )));
        }
        Ok(descriptor)
    }

    fn list(&self) -> Result<Vec<ScenarioId>> {
        let mut out = Vec::new();
        if !Path::new(&self.dir).is_dir() {
            return Ok(out);
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if let (true, Some(stem)) = (is_yaml, path.file_stem().and_then(|s| s.to_str())) {
                out.push(ScenarioId::new(stem));
            }
        }
        out.sort();
        out.dedup();
        Ok(out)
    }
}
