//! Secrets groups and secret associations
//!
//! A SecretsGroup ties secrets to the way they are used: each association is
//! tagged with an access type (how the device is reached) and a secret type
//! (what the value is). At most one association per pair is expected.

use crate::error::TypeError;
use crate::SecretsGroupId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How a secret is used to reach a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessType {
    #[default]
    Generic,
    Console,
    Gnmi,
    Http,
    Netconf,
    Rest,
    Restconf,
    Snmp,
    Ssh,
}

impl AccessType {
    pub const ALL: [AccessType; 9] = [
        AccessType::Generic,
        AccessType::Console,
        AccessType::Gnmi,
        AccessType::Http,
        AccessType::Netconf,
        AccessType::Rest,
        AccessType::Restconf,
        AccessType::Snmp,
        AccessType::Ssh,
    ];

    /// Label used in templates and by the secrets backend
    pub fn label(&self) -> &'static str {
        match self {
            AccessType::Generic => "Generic",
            AccessType::Console => "Console",
            AccessType::Gnmi => "gNMI",
            AccessType::Http => "HTTP(S)",
            AccessType::Netconf => "NETCONF",
            AccessType::Rest => "REST",
            AccessType::Restconf => "RESTCONF",
            AccessType::Snmp => "SNMP",
            AccessType::Ssh => "SSH",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccessType {
    type Err = TypeError;

    /// Labels are matched case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessType::ALL
            .into_iter()
            .find(|access| access.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownAccessType(s.to_string()))
    }
}

/// What kind of value a secret holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
    Key,
    Password,
    Secret,
    Token,
    Username,
}

impl SecretType {
    pub const ALL: [SecretType; 5] = [
        SecretType::Key,
        SecretType::Password,
        SecretType::Secret,
        SecretType::Token,
        SecretType::Username,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecretType::Key => "key",
            SecretType::Password => "password",
            SecretType::Secret => "secret",
            SecretType::Token => "token",
            SecretType::Username => "username",
        }
    }
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SecretType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownSecretType(s.to_string()))
    }
}

/// Pointer to a secret held by a secrets provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    pub name: String,

    /// Provider slug, e.g. `environment-variable`
    pub provider: String,

    /// Provider-specific parameters, e.g. `variable = "NET_PASSWORD"`
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl SecretRef {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

/// A secret bound into a group for one access type and secret type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretAssociation {
    pub access_type: AccessType,
    pub secret_type: SecretType,
    pub secret: SecretRef,
}

/// Named collection of secret associations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretsGroup {
    pub id: SecretsGroupId,
    pub name: String,
    #[serde(default)]
    pub secrets: Vec<SecretAssociation>,
}

impl SecretsGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SecretsGroupId::new(id),
            name: name.into(),
            secrets: Vec::new(),
        }
    }

    pub fn with_secret(
        mut self,
        access_type: AccessType,
        secret_type: SecretType,
        secret: SecretRef,
    ) -> Self {
        self.secrets.push(SecretAssociation {
            access_type,
            secret_type,
            secret,
        });
        self
    }

    /// All associations registered for an (access type, secret type) pair
    pub fn associations(
        &self,
        access_type: AccessType,
        secret_type: SecretType,
    ) -> impl Iterator<Item = &SecretAssociation> {
        self.secrets
            .iter()
            .filter(move |a| a.access_type == access_type && a.secret_type == secret_type)
    }
}
