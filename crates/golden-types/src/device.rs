//! Device types
//!
//! A Device is owned by the device directory. The post-processing core only
//! reads it: its attributes drive scope filtering, its platform selects
//! platform-specific behavior, and its group memberships drive settings
//! precedence.

use crate::error::TypeError;
use crate::{DeviceId, GroupId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Directory attribute a device can be filtered on
///
/// Each attribute holds a reference (identifier) to another directory
/// object, and filters on it by identifier equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceField {
    Platform,
    TenantGroup,
    Tenant,
    Region,
    Site,
    Role,
    Rack,
    RackGroup,
    Manufacturer,
    DeviceType,
}

impl DeviceField {
    /// Every filterable field, in a stable order
    pub const ALL: [DeviceField; 10] = [
        DeviceField::Platform,
        DeviceField::TenantGroup,
        DeviceField::Tenant,
        DeviceField::Region,
        DeviceField::Site,
        DeviceField::Role,
        DeviceField::Rack,
        DeviceField::RackGroup,
        DeviceField::Manufacturer,
        DeviceField::DeviceType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceField::Platform => "platform",
            DeviceField::TenantGroup => "tenant_group",
            DeviceField::Tenant => "tenant",
            DeviceField::Region => "region",
            DeviceField::Site => "site",
            DeviceField::Role => "role",
            DeviceField::Rack => "rack",
            DeviceField::RackGroup => "rack_group",
            DeviceField::Manufacturer => "manufacturer",
            DeviceField::DeviceType => "device_type",
        }
    }
}

impl fmt::Display for DeviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceField {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| TypeError::UnknownDeviceField(s.to_string()))
    }
}

/// A managed network device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Directory identifier
    pub id: DeviceId,

    /// Display name
    pub name: String,

    /// Attribute references (platform, site, role, ...)
    #[serde(default)]
    pub attributes: BTreeMap<DeviceField, String>,

    /// Tag names
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Groups this device is a member of
    #[serde(default)]
    pub groups: BTreeSet<GroupId>,
}

impl Device {
    /// Create a device with no attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(id),
            name: name.into(),
            attributes: BTreeMap::new(),
            tags: BTreeSet::new(),
            groups: BTreeSet::new(),
        }
    }

    /// Set an attribute reference
    pub fn with_attribute(mut self, field: DeviceField, value: impl Into<String>) -> Self {
        self.attributes.insert(field, value.into());
        self
    }

    /// Set the platform reference
    pub fn with_platform(self, platform: impl Into<String>) -> Self {
        self.with_attribute(DeviceField::Platform, platform)
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add a group membership
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.groups.insert(group);
        self
    }

    /// Get an attribute reference
    pub fn attribute(&self, field: DeviceField) -> Option<&str> {
        self.attributes.get(&field).map(String::as_str)
    }

    /// Platform reference, required for rendering and provisioning
    pub fn platform(&self) -> Option<&str> {
        self.attribute(DeviceField::Platform)
    }

    /// Check group membership
    pub fn is_member_of(&self, group: &GroupId) -> bool {
        self.groups.contains(group)
    }
}
