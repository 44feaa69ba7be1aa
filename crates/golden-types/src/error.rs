//! Error types for parsing domain values

use thiserror::Error;

/// Errors raised when a textual value does not name a known choice
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Unknown secret access type: {0}")]
    UnknownAccessType(String),

    #[error("Unknown secret type: {0}")]
    UnknownSecretType(String),

    #[error("Unknown device field: {0}")]
    UnknownDeviceField(String),
}
