#![forbid(unsafe_code)]
//! seedkit-gen: deterministic synthetic campaign and metric generation.
//!
//! Every value is a pure function of `(scenario, seed, platform[, day])`:
//! - each stream is a ChaCha20 RNG keyed by a BLAKE3 digest of exactly those
//!   inputs, so generating one platform never perturbs another;
//! - no wall-clock reads, no process-global counters;
//! - trend shaping is integer basis-point arithmetic, so output is
//!   byte-identical across machines.
//!
//! **No I/O** here. The exec crate hands the resulting batches to a store.

pub mod batch;
pub mod generator;
pub mod trend;

pub use batch::{build_platform_batch, day_range};
pub use generator::{generate, generate_campaign, CampaignValues, MetricValues};
pub use trend::trend_factor_bp;
