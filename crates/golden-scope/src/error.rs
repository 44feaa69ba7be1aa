//! Error types for scope resolution

use golden_directory::DirectoryError;
use thiserror::Error;

/// Device scope errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The union of all configured groups selects no device
    #[error("The base scope didn't find any devices. Please check the settings scope.")]
    EmptyBaseScope,

    /// Job parameters exclude every device in the base scope
    #[error(
        "The provided job parameters didn't match any devices detected by the settings scope. \
         Please check the scope defined within the settings or select the correct job parameters."
    )]
    NoMatchingDevices,

    /// Matched devices lack the platform required for rendering
    #[error("The following device(s) {} have no platform defined. Platform is required.", .devices.join(", "))]
    MissingPlatform { devices: Vec<String> },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Result type for scope operations
pub type Result<T> = std::result::Result<T, ScopeError>;
