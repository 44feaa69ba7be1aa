//! Job parameters that narrow the device scope

use crate::{DeviceField, DeviceId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Explicit device selection: one device or a set of devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceSelection {
    Single(DeviceId),
    Many(BTreeSet<DeviceId>),
}

impl DeviceSelection {
    /// Identifiers covered by this selection
    pub fn ids(&self) -> BTreeSet<DeviceId> {
        match self {
            DeviceSelection::Single(id) => BTreeSet::from([id.clone()]),
            DeviceSelection::Many(ids) => ids.clone(),
        }
    }
}

/// Recognized job parameters
///
/// Every field constraint is a set of directory object identifiers; tags are
/// matched by tag name. Absent or empty constraints do not narrow the scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeParams {
    #[serde(flatten)]
    pub fields: BTreeMap<DeviceField, BTreeSet<String>>,

    #[serde(default, rename = "tag", skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceSelection>,
}

impl ScopeParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: DeviceField, value: impl Into<String>) -> Self {
        self.fields.entry(field).or_default().insert(value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = Some(DeviceSelection::Single(device));
        self
    }

    pub fn with_devices(mut self, devices: impl IntoIterator<Item = DeviceId>) -> Self {
        self.device = Some(DeviceSelection::Many(devices.into_iter().collect()));
        self
    }

    /// Whether no parameter narrows the scope
    pub fn is_unconstrained(&self) -> bool {
        self.fields.values().all(BTreeSet::is_empty)
            && self.tags.is_empty()
            && self.device.is_none()
    }
}
