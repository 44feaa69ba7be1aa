//! Device directory trait
//!
//! The directory owns devices, groups, settings objects and secrets groups.
//! The post-processing core only reads from it.

use crate::error::Result;
use crate::predicate::DevicePredicate;
use golden_types::{Device, DeviceId, Group, GroupId, SecretsGroup, SecretsGroupId, SettingsObject};

/// Read access to the device inventory
pub trait DeviceDirectory: Send + Sync {
    /// Devices matching a predicate, ordered by name
    ///
    /// Returned devices carry their current group memberships.
    fn find_devices(&self, predicate: &DevicePredicate) -> Result<Vec<Device>>;

    /// Get a device by ID
    fn device(&self, id: &DeviceId) -> Result<Option<Device>>;

    /// Get a group by ID
    fn group(&self, id: &GroupId) -> Result<Option<Group>>;

    /// All configured settings objects
    fn settings(&self) -> Result<Vec<SettingsObject>>;

    /// Get a secrets group by ID
    fn secrets_group(&self, id: &SecretsGroupId) -> Result<Option<SecretsGroup>>;

    /// Check whether any device matches a predicate
    fn any_device(&self, predicate: &DevicePredicate) -> Result<bool> {
        Ok(!self.find_devices(predicate)?.is_empty())
    }
}
