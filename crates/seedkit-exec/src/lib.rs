#![forbid(unsafe_code)]
//! seedkit-exec: the seeding runtime.
//!
//! `Seeder::run` walks SAFETY_CHECK → LOAD_SCENARIO → VALIDATE_SCENARIO →
//! VALIDATE_INPUT → EXECUTE → VERIFY, records each outcome in a `Manifest`,
//! and stops at the first failure. It never returns an error or panics out:
//! every outcome, including a blocked run, comes back as a `SeedOutcome`.

pub mod error;
pub mod metrics;
pub mod replay;
pub mod runtime;
pub mod steps;

pub use error::ExecError;
pub use runtime::Seeder;
pub use steps::hygiene::SeedPlan;
