//! Authorization oracle trait

use golden_types::Principal;

/// Capability required to read secrets out of a secrets group
pub const VIEW_SECRETS_GROUP: &str = "extras.view_secretsgroup";

/// Answers capability checks
pub trait AuthorizationOracle: Send + Sync {
    /// Whether `principal` holds `capability`
    fn has_capability(&self, principal: &Principal, capability: &str) -> bool;

    /// Whether `capability` is exempt from checks for every caller
    fn is_exempt(&self, capability: &str) -> bool;
}
