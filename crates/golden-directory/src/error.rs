//! Error types for collaborator calls

use golden_types::{AccessType, GroupId, SecretType, SecretsGroupId};
use thiserror::Error;

/// Device directory errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("Group {0} already has a settings object")]
    SettingsConflict(GroupId),

    #[error("Directory backend error: {0}")]
    Backend(String),
}

/// Secret resolution errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("Secrets group not found: {0}")]
    SecretsGroupNotFound(SecretsGroupId),

    #[error("No secret of type {secret_type} for access type {access_type} in secrets group {group}")]
    SecretNotFound {
        group: SecretsGroupId,
        access_type: AccessType,
        secret_type: SecretType,
    },

    #[error("More than one secret of type {secret_type} for access type {access_type} in secrets group {group}")]
    AmbiguousSecret {
        group: SecretsGroupId,
        access_type: AccessType,
        secret_type: SecretType,
    },

    #[error("Unsupported secrets provider: {0}")]
    UnsupportedProvider(String),

    #[error("Secrets provider failed for {secret}: {message}")]
    Provider { secret: String, message: String },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Context data query errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Context query {query} failed for device {device}: {message}")]
    QueryFailed {
        device: String,
        query: String,
        message: String,
    },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Result type for directory operations
pub type Result<T> = std::result::Result<T, DirectoryError>;
