//! Fixture provider: optional enrichment data for scenarios.
//!
//! A scenario may reference a fixture by name plus a BLAKE3 hex checksum. The
//! fixture is JSON:
//! ```json
//! { "campaign_names": { "google": "Brand Search", "facebook": "Lookalikes" } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use seedkit_core::types::Platform;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Fixture {
    pub fn checksum(&self) -> String {
        let mut h = Hasher::new();
        h.update(&self.bytes);
        h.finalize().to_hex().to_string()
    }
}

/// Per-platform campaign name overrides carried by a fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignNames {
    #[serde(default)]
    pub campaign_names: BTreeMap<Platform, String>,
}

impl CampaignNames {
    pub fn from_fixture(fixture: &Fixture) -> Result<Self> {
        serde_json::from_slice(&fixture.bytes)
            .map_err(|e| Error::Fixture(format!("{}: {e}", fixture.name)))
    }

    pub fn get(&self, platform: Platform) -> Option<&str> {
        self.campaign_names.get(&platform).map(String::as_str)
    }
}

pub trait FixtureProvider: Send + Sync {
    fn load_fixture(&self, name: &str) -> Result<Fixture>;

    /// Compare the fixture's BLAKE3 digest against `expected` (hex, case-insensitive).
    fn validate_checksum(&self, fixture: &Fixture, expected: &str) -> Result<()> {
        let actual = fixture.checksum();
        if actual.eq_ignore_ascii_case(expected.trim()) {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch {
                name: fixture.name.clone(),
                expected: expected.to_string(),
                actual,
            })
        }
    }
}

/// Reads fixtures from a local directory.
#[derive(Debug, Clone)]
pub struct FsFixtureProvider {
    root: PathBuf,
}

impl FsFixtureProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FixtureProvider for FsFixtureProvider {
    fn load_fixture(&self, name: &str) -> Result<Fixture> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(Error::FixtureNotFound(name.to_string()));
        }
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(Error::FixtureNotFound(name.to_string()));
        }
        let bytes = fs::read(&path)?;
        Ok(Fixture {
            name: name.to_string(),
            bytes,
        })
    }
}
