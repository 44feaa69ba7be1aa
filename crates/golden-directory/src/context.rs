//! Context data query executor trait

use crate::error::ContextError;
use golden_types::{ContextQueryRef, Device};

/// Template namespace produced by a context query
pub type ContextData = serde_json::Map<String, serde_json::Value>;

/// Runs a stored context query against a device
///
/// Calls are blocking and bound by query latency; callers impose timeouts.
pub trait ContextQueryExecutor: Send + Sync {
    fn fetch(
        &self,
        device: &Device,
        query: &ContextQueryRef,
    ) -> std::result::Result<ContextData, ContextError>;
}
