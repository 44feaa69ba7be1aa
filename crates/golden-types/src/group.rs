//! Device groups and their stored filters

use crate::{DeviceField, DeviceId, GroupId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A named, stored device-selection filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub filter: GroupFilter,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, filter: GroupFilter) -> Self {
        Self {
            id: GroupId::new(id),
            name: name.into(),
            filter,
        }
    }

    /// A group that matches every device
    pub fn match_all(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, GroupFilter::default())
    }
}

/// Filter expression over device attributes
///
/// Constraints on different fields are AND-combined; the values listed for a
/// single field (and the tag list, and the device list) are alternatives.
/// An empty filter is trivial and matches all devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    #[serde(default)]
    pub fields: BTreeMap<DeviceField, BTreeSet<String>>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub devices: BTreeSet<DeviceId>,
}

impl GroupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain a field to one more accepted value
    pub fn with_field(mut self, field: DeviceField, value: impl Into<String>) -> Self {
        self.fields.entry(field).or_default().insert(value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.devices.insert(device);
        self
    }

    /// Whether this filter places no constraint at all
    pub fn is_trivial(&self) -> bool {
        self.fields.values().all(BTreeSet::is_empty)
            && self.tags.is_empty()
            && self.devices.is_empty()
    }
}
