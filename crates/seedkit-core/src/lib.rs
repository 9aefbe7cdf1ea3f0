#![forbid(unsafe_code)]
//! seedkit-core: shared vocabulary for the seeding pipeline.
//!
//! Pure data and pure helpers only: request/scenario/row types, the run
//! manifest, provenance tagging, stable hashing, and environment config.
//! No I/O happens here; the store, loader and fixture traits live in
//! `seedkit-io`, and the pipeline that drives them lives in `seedkit-exec`.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod manifest;
pub mod prelude;
pub mod provenance;
pub mod scenario;
pub mod types;

/// Crate version, stamped into every manifest for provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
