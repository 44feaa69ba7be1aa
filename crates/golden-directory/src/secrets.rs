//! Secret store trait

use crate::error::SecretError;
use golden_types::{AccessType, SecretType, SecretsGroup};

/// Resolves secret values out of a secrets group
pub trait SecretStore: Send + Sync {
    /// Value of the single secret registered for (`access_type`, `secret_type`)
    fn secret_value(
        &self,
        group: &SecretsGroup,
        access_type: AccessType,
        secret_type: SecretType,
    ) -> std::result::Result<String, SecretError>;
}
