#![forbid(unsafe_code)]
//! seedkit-io: the collaborators the seeding pipeline talks to.
//!
//! - `store`: the transactional `DataStore` interface and its row predicates.
//! - `memory_store`: an in-memory `DataStore` with a call journal, used by
//!   tests and by the CLI.
//! - `scenario_loader`: `ScenarioLoader` plus built-in and YAML-directory
//!   implementations.
//! - `fixtures`: `FixtureProvider` with BLAKE3 checksum validation.

pub mod error;
pub mod fixtures;
pub mod memory_store;
pub mod scenario_loader;
pub mod store;

pub use error::{Error, Result};
pub use fixtures::{CampaignNames, Fixture, FixtureProvider, FsFixtureProvider};
pub use memory_store::{MemoryDataStore, StoreCall};
pub use scenario_loader::{ScenarioLoader, StaticScenarioLoader, YamlScenarioLoader};
pub use store::{CampaignFilter, DataStore, MetricFilter, RealRecord, Table, Transaction};
