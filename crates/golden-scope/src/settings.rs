//! Device to settings resolution
//!
//! Settings are attached to groups; a device picks up the settings object
//! of the heaviest group it belongs to.

use crate::error::Result;
use golden_directory::DeviceDirectory;
use golden_types::{Device, DeviceId, SettingsObject};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Precedence order: higher weight first, then lower group id
fn precedence(a: &SettingsObject, b: &SettingsObject) -> Ordering {
    b.weight
        .cmp(&a.weight)
        .then_with(|| a.group.cmp(&b.group))
}

/// Pick the settings object that applies to `device`, if any
pub fn select_settings<'a>(
    device: &Device,
    settings: &'a [SettingsObject],
) -> Option<&'a SettingsObject> {
    settings
        .iter()
        .filter(|s| device.is_member_of(&s.group))
        .min_by(|a, b| precedence(a, b))
}

/// Map each device to its applicable settings object
///
/// Devices without any qualifying group are absent from the result.
pub fn map_devices_to_settings(
    devices: &[Device],
    settings: &[SettingsObject],
) -> HashMap<DeviceId, SettingsObject> {
    devices
        .iter()
        .filter_map(|device| {
            let selected = select_settings(device, settings)?;
            debug!(
                device = %device.name,
                settings = %selected.id,
                weight = selected.weight,
                "Resolved settings for device"
            );
            Some((device.id.clone(), selected.clone()))
        })
        .collect()
}

/// Settings resolution backed by a device directory
#[derive(Clone)]
pub struct SettingsResolver {
    directory: Arc<dyn DeviceDirectory>,
}

impl SettingsResolver {
    pub fn new(directory: Arc<dyn DeviceDirectory>) -> Self {
        Self { directory }
    }

    /// Map each device to its applicable settings object
    #[instrument(skip(self, devices), fields(devices = devices.len()))]
    pub fn map_devices(&self, devices: &[Device]) -> Result<HashMap<DeviceId, SettingsObject>> {
        let settings = self.directory.settings()?;
        Ok(map_devices_to_settings(devices, &settings))
    }

    /// Settings object for a single device
    pub fn settings_for(&self, device: &Device) -> Result<Option<SettingsObject>> {
        let settings = self.directory.settings()?;
        Ok(select_settings(device, &settings).cloned())
    }
}
