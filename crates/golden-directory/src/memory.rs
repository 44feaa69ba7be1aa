//! In-memory implementations of the collaborator traits
//!
//! These are suitable for development and testing. Production deployments
//! should use persistent backends.

use crate::authz::AuthorizationOracle;
use crate::context::{ContextData, ContextQueryExecutor};
use crate::directory::DeviceDirectory;
use crate::error::{ContextError, DirectoryError, Result, SecretError};
use crate::membership::FilterMembershipResolver;
use crate::predicate::DevicePredicate;
use crate::secrets::SecretStore;
use dashmap::{DashMap, DashSet};
use golden_types::{
    AccessType, ContextQueryRef, Device, DeviceId, Group, GroupId, Principal, SecretType,
    SecretsGroup, SecretsGroupId, SettingsObject,
};
use std::collections::BTreeSet;
use tracing::debug;

/// In-memory device directory
///
/// Group membership is derived from the stored group filters whenever a
/// device is read, so memberships always agree with the filters.
pub struct InMemoryDirectory {
    devices: DashMap<DeviceId, Device>,
    groups: DashMap<GroupId, Group>,
    settings: DashMap<GroupId, SettingsObject>,
    secrets_groups: DashMap<SecretsGroupId, SecretsGroup>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            devices: DashMap::new(),
            groups: DashMap::new(),
            settings: DashMap::new(),
            secrets_groups: DashMap::new(),
        }
    }

    pub fn add_device(&self, device: Device) {
        self.devices.insert(device.id.clone(), device);
    }

    pub fn add_group(&self, group: Group) {
        self.groups.insert(group.id.clone(), group);
    }

    /// Attach settings to a group; each group holds at most one
    pub fn add_settings(&self, settings: SettingsObject) -> Result<()> {
        if !self.groups.contains_key(&settings.group) {
            return Err(DirectoryError::GroupNotFound(settings.group.clone()));
        }
        if self.settings.contains_key(&settings.group) {
            return Err(DirectoryError::SettingsConflict(settings.group.clone()));
        }
        self.settings.insert(settings.group.clone(), settings);
        Ok(())
    }

    pub fn add_secrets_group(&self, group: SecretsGroup) {
        self.secrets_groups.insert(group.id.clone(), group);
    }

    fn with_memberships(&self, mut device: Device) -> Device {
        device.groups = self
            .groups
            .iter()
            .filter(|g| FilterMembershipResolver::predicate_for(&g.filter).matches(&device))
            .map(|g| g.id.clone())
            .collect::<BTreeSet<_>>();
        device
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDirectory for InMemoryDirectory {
    fn find_devices(&self, predicate: &DevicePredicate) -> Result<Vec<Device>> {
        let mut found: Vec<Device> = self
            .devices
            .iter()
            .filter(|d| predicate.matches(d.value()))
            .map(|d| self.with_memberships(d.value().clone()))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    fn device(&self, id: &DeviceId) -> Result<Option<Device>> {
        Ok(self
            .devices
            .get(id)
            .map(|d| self.with_memberships(d.value().clone())))
    }

    fn group(&self, id: &GroupId) -> Result<Option<Group>> {
        Ok(self.groups.get(id).map(|g| g.clone()))
    }

    fn settings(&self) -> Result<Vec<SettingsObject>> {
        let mut all: Vec<SettingsObject> = self.settings.iter().map(|s| s.value().clone()).collect();
        all.sort_by(|a, b| a.group.cmp(&b.group));
        Ok(all)
    }

    fn secrets_group(&self, id: &SecretsGroupId) -> Result<Option<SecretsGroup>> {
        Ok(self.secrets_groups.get(id).map(|g| g.clone()))
    }
}

/// Authorization oracle backed by an explicit grant table
pub struct StaticAuthorizationOracle {
    grants: DashMap<String, BTreeSet<String>>,
    exempt: DashSet<String>,
}

impl StaticAuthorizationOracle {
    pub fn new() -> Self {
        Self {
            grants: DashMap::new(),
            exempt: DashSet::new(),
        }
    }

    /// Grant a capability to a user
    pub fn grant(&self, username: impl Into<String>, capability: impl Into<String>) {
        self.grants
            .entry(username.into())
            .or_default()
            .insert(capability.into());
    }

    /// Revoke a capability from a user
    pub fn revoke(&self, username: &str, capability: &str) {
        if let Some(mut caps) = self.grants.get_mut(username) {
            caps.remove(capability);
        }
    }

    /// Exempt a capability from checks for every caller
    pub fn exempt(&self, capability: impl Into<String>) {
        self.exempt.insert(capability.into());
    }
}

impl Default for StaticAuthorizationOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationOracle for StaticAuthorizationOracle {
    fn has_capability(&self, principal: &Principal, capability: &str) -> bool {
        principal.is_authenticated()
            && self
                .grants
                .get(&principal.username)
                .is_some_and(|caps| caps.contains(capability))
    }

    fn is_exempt(&self, capability: &str) -> bool {
        self.exempt.contains(capability)
    }
}

/// Context executor serving fixed per-device data
pub struct StaticContextExecutor {
    data: DashMap<DeviceId, ContextData>,
}

impl StaticContextExecutor {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    pub fn insert(&self, device: DeviceId, data: ContextData) {
        self.data.insert(device, data);
    }

    /// Insert context from a JSON object value; non-objects are ignored
    pub fn insert_json(&self, device: DeviceId, value: serde_json::Value) {
        if let serde_json::Value::Object(map) = value {
            self.insert(device, map);
        }
    }
}

impl Default for StaticContextExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextQueryExecutor for StaticContextExecutor {
    fn fetch(
        &self,
        device: &Device,
        query: &ContextQueryRef,
    ) -> std::result::Result<ContextData, ContextError> {
        self.data
            .get(&device.id)
            .map(|d| d.value().clone())
            .ok_or_else(|| ContextError::QueryFailed {
                device: device.name.clone(),
                query: query.name.clone(),
                message: "no context data for device".into(),
            })
    }
}

/// Provider slug handled by [`EnvironmentSecretStore`]
pub const ENVIRONMENT_PROVIDER: &str = "environment-variable";

type VariableLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Secret store reading values from environment variables
///
/// Each secret must use the `environment-variable` provider and name the
/// variable in its `variable` parameter.
pub struct EnvironmentSecretStore {
    lookup: VariableLookup,
}

impl EnvironmentSecretStore {
    /// Read from the process environment
    pub fn new() -> Self {
        Self {
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Read from a custom variable source
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvironmentSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for EnvironmentSecretStore {
    fn secret_value(
        &self,
        group: &SecretsGroup,
        access_type: AccessType,
        secret_type: SecretType,
    ) -> std::result::Result<String, SecretError> {
        let mut matches = group.associations(access_type, secret_type);
        let association = matches.next().ok_or_else(|| SecretError::SecretNotFound {
            group: group.id.clone(),
            access_type,
            secret_type,
        })?;
        if matches.next().is_some() {
            return Err(SecretError::AmbiguousSecret {
                group: group.id.clone(),
                access_type,
                secret_type,
            });
        }

        let secret = &association.secret;
        if secret.provider != ENVIRONMENT_PROVIDER {
            return Err(SecretError::UnsupportedProvider(secret.provider.clone()));
        }
        let variable = secret.parameter("variable").ok_or_else(|| SecretError::Provider {
            secret: secret.name.clone(),
            message: "missing `variable` parameter".into(),
        })?;

        debug!(secrets_group = %group.id, secret = %secret.name, "Reading secret from environment");
        (self.lookup)(variable).ok_or_else(|| SecretError::Provider {
            secret: secret.name.clone(),
            message: format!("environment variable {variable} is not set"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_types::{DeviceField, GroupFilter, SecretRef};

    fn directory() -> InMemoryDirectory {
        let dir = InMemoryDirectory::new();
        dir.add_group(Group::new(
            "ios",
            "IOS devices",
            GroupFilter::new().with_field(DeviceField::Platform, "cisco_ios"),
        ));
        dir.add_group(Group::match_all("all", "All devices"));
        dir.add_device(Device::new("2", "b-router").with_platform("cisco_ios"));
        dir.add_device(Device::new("1", "a-switch").with_platform("arista_eos"));
        dir
    }

    #[test]
    fn test_find_devices_sorted_with_memberships() {
        let dir = directory();
        let devices = dir.find_devices(&DevicePredicate::All).unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "a-switch");
        assert_eq!(
            devices[0].groups,
            BTreeSet::from([GroupId::new("all")])
        );
        assert_eq!(
            devices[1].groups,
            BTreeSet::from([GroupId::new("all"), GroupId::new("ios")])
        );
    }

    #[test]
    fn test_settings_one_per_group() {
        let dir = directory();
        dir.add_settings(SettingsObject::new("s1", GroupId::new("ios"), 10))
            .unwrap();

        let err = dir
            .add_settings(SettingsObject::new("s2", GroupId::new("ios"), 20))
            .unwrap_err();
        assert_eq!(err, DirectoryError::SettingsConflict(GroupId::new("ios")));

        let err = dir
            .add_settings(SettingsObject::new("s3", GroupId::new("missing"), 1))
            .unwrap_err();
        assert_eq!(err, DirectoryError::GroupNotFound(GroupId::new("missing")));
    }

    #[test]
    fn test_authorization_grants() {
        let oracle = StaticAuthorizationOracle::new();
        let alice = Principal::user("alice");

        assert!(!oracle.has_capability(&alice, "view"));
        oracle.grant("alice", "view");
        assert!(oracle.has_capability(&alice, "view"));
        oracle.revoke("alice", "view");
        assert!(!oracle.has_capability(&alice, "view"));
    }

    #[test]
    fn test_anonymous_never_holds_capabilities() {
        let oracle = StaticAuthorizationOracle::new();
        oracle.grant("anonymous", "view");
        assert!(!oracle.has_capability(&Principal::anonymous(), "view"));
    }

    #[test]
    fn test_context_executor_missing_device() {
        let executor = StaticContextExecutor::new();
        let query = ContextQueryRef::new("base", "query { device }");
        let err = executor
            .fetch(&Device::new("1", "edge-01"), &query)
            .unwrap_err();
        assert!(matches!(err, ContextError::QueryFailed { .. }));
    }

    fn secrets_group() -> SecretsGroup {
        SecretsGroup::new("sg1", "Lab").with_secret(
            AccessType::Generic,
            SecretType::Password,
            SecretRef::new("lab-password", ENVIRONMENT_PROVIDER)
                .with_parameter("variable", "LAB_PASSWORD"),
        )
    }

    #[test]
    fn test_environment_store_reads_variable() {
        let store = EnvironmentSecretStore::with_lookup(|name| {
            (name == "LAB_PASSWORD").then(|| "hunter2".to_string())
        });
        let value = store
            .secret_value(&secrets_group(), AccessType::Generic, SecretType::Password)
            .unwrap();
        assert_eq!(value, "hunter2");
    }

    #[test]
    fn test_environment_store_errors() {
        let store = EnvironmentSecretStore::with_lookup(|_| None);
        let group = secrets_group();

        assert!(matches!(
            store.secret_value(&group, AccessType::Ssh, SecretType::Password),
            Err(SecretError::SecretNotFound { .. })
        ));
        assert!(matches!(
            store.secret_value(&group, AccessType::Generic, SecretType::Password),
            Err(SecretError::Provider { .. })
        ));

        let ambiguous = group.clone().with_secret(
            AccessType::Generic,
            SecretType::Password,
            SecretRef::new("other", ENVIRONMENT_PROVIDER).with_parameter("variable", "X"),
        );
        assert!(matches!(
            store.secret_value(&ambiguous, AccessType::Generic, SecretType::Password),
            Err(SecretError::AmbiguousSecret { .. })
        ));

        let vault = SecretsGroup::new("sg2", "Vault").with_secret(
            AccessType::Generic,
            SecretType::Token,
            SecretRef::new("token", "hashicorp-vault"),
        );
        assert_eq!(
            store.secret_value(&vault, AccessType::Generic, SecretType::Token),
            Err(SecretError::UnsupportedProvider("hashicorp-vault".into()))
        );
    }
}
