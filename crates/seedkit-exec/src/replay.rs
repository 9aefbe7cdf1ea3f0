//! Deterministic replay & provenance helpers.
//!
//! The payload digest is computed from the serialized batches in platform
//! order. Identical requests against identical scenarios produce identical
//! digests, which is how two manifests can be compared without the rows.

use seedkit_core::hash::{hash_serde, Hash256};
use seedkit_core::types::{PlatformBatch, SeedRequest};

use crate::ExecError;

/// Hash the request as received (platform list order included).
pub fn request_digest(request: &SeedRequest) -> Result<Hash256, ExecError> {
    hash_serde(request).map_err(|e| ExecError::Hash(e.to_string()))
}

/// Hash the generated rows.
pub fn payload_digest(batches: &[PlatformBatch]) -> Result<Hash256, ExecError> {
    hash_serde(&batches).map_err(|e| ExecError::Hash(e.to_string()))
}
