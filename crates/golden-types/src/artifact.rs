//! Stored intended configuration of a device

use crate::Device;
use serde::{Deserialize, Serialize};

/// Previously computed intended configuration, read by the push pipeline
///
/// The pipeline never mutates this record; it produces a separate push
/// artifact string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntendedConfigArtifact {
    pub device: Device,

    #[serde(default)]
    pub intended_config: Option<String>,
}

impl IntendedConfigArtifact {
    pub fn new(device: Device, intended_config: impl Into<String>) -> Self {
        Self {
            device,
            intended_config: Some(intended_config.into()),
        }
    }

    /// A device for which no intended configuration has been generated yet
    pub fn empty(device: Device) -> Self {
        Self {
            device,
            intended_config: None,
        }
    }

    /// Stored configuration text, treating an empty string as absent
    pub fn intended(&self) -> Option<&str> {
        self.intended_config.as_deref().filter(|c| !c.is_empty())
    }
}
