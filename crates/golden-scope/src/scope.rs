//! Device scope construction
//!
//! The base scope is the union of every group that has settings attached;
//! job parameters then narrow it. Each failure mode has its own error so the
//! caller can tell a misconfigured settings scope from over-narrow job
//! parameters.

use crate::error::{Result, ScopeError};
use golden_directory::{DeviceDirectory, DevicePredicate, DirectoryError, GroupMembershipResolver};
use golden_types::{Device, DeviceField, ScopeParams};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Builds and validates the device set a job runs against
#[derive(Clone)]
pub struct ScopeQueryBuilder {
    directory: Arc<dyn DeviceDirectory>,
    membership: Arc<dyn GroupMembershipResolver>,
}

impl ScopeQueryBuilder {
    pub fn new(
        directory: Arc<dyn DeviceDirectory>,
        membership: Arc<dyn GroupMembershipResolver>,
    ) -> Self {
        Self {
            directory,
            membership,
        }
    }

    /// Predicate covering every group with settings attached
    ///
    /// A single match-all group makes the scope unrestricted. With no
    /// settings configured the scope is empty.
    pub fn base_scope(&self) -> Result<DevicePredicate> {
        let mut groups = Vec::new();
        for settings in self.directory.settings()? {
            let group = self
                .directory
                .group(&settings.group)?
                .ok_or_else(|| DirectoryError::GroupNotFound(settings.group.clone()))?;
            groups.push(group);
        }

        if groups.iter().any(|g| g.filter.is_trivial()) {
            debug!("A settings group matches all devices; base scope is unrestricted");
            return Ok(DevicePredicate::All);
        }

        let mut scope = DevicePredicate::Nothing;
        for group in &groups {
            scope = scope.or(self.membership.evaluate(group)?);
        }
        Ok(scope)
    }

    /// Predicate expressing the job parameters
    pub fn job_predicate(params: &ScopeParams) -> DevicePredicate {
        let mut constraints = Vec::new();

        for field in DeviceField::ALL {
            if let Some(values) = params.fields.get(&field).filter(|v| !v.is_empty()) {
                constraints.push(DevicePredicate::field_in(field, values.iter().cloned()));
            }
        }
        if !params.tags.is_empty() {
            constraints.push(DevicePredicate::tag_in(params.tags.iter().cloned()));
        }
        if let Some(selection) = &params.device {
            constraints.push(DevicePredicate::IdIn(selection.ids()));
        }

        DevicePredicate::all_of(constraints)
    }

    /// Devices in scope for a job, ordered by name
    ///
    /// Fails with [`ScopeError::EmptyBaseScope`] when the configured groups
    /// select nothing, [`ScopeError::NoMatchingDevices`] when the job
    /// parameters exclude everything, and [`ScopeError::MissingPlatform`]
    /// when any selected device has no platform.
    #[instrument(skip(self, params))]
    pub fn build_device_query(&self, params: &ScopeParams) -> Result<Vec<Device>> {
        let base = self.base_scope()?;
        if !self.directory.any_device(&base)? {
            warn!("Base scope matched no devices");
            return Err(ScopeError::EmptyBaseScope);
        }

        let devices = self
            .directory
            .find_devices(&base.and(Self::job_predicate(params)))?;
        if devices.is_empty() {
            warn!("Job parameters matched no devices in the base scope");
            return Err(ScopeError::NoMatchingDevices);
        }

        let missing: Vec<String> = devices
            .iter()
            .filter(|d| DevicePredicate::PlatformMissing.matches(d))
            .map(|d| d.name.clone())
            .collect();
        if !missing.is_empty() {
            warn!(count = missing.len(), "Devices in scope have no platform");
            return Err(ScopeError::MissingPlatform { devices: missing });
        }

        info!(devices = devices.len(), "Resolved device scope");
        Ok(devices)
    }
}
