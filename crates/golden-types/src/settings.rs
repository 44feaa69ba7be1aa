//! Settings objects attached to device groups

use crate::{GroupId, SecretsGroupId, SettingsId};
use serde::{Deserialize, Serialize};

/// Reference to the stored query that supplies template context for a device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextQueryRef {
    /// Query name in the context query store
    pub name: String,

    /// Query text handed to the context data executor
    pub query: String,
}

impl ContextQueryRef {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
        }
    }
}

/// Per-group configuration; one settings object per group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsObject {
    pub id: SettingsId,

    pub name: String,

    /// Group this settings object is attached to
    pub group: GroupId,

    /// Precedence; higher wins
    pub weight: i64,

    /// Secrets group used when rendering secrets
    #[serde(default)]
    pub secrets_group: Option<SecretsGroupId>,

    /// Query producing the template context
    #[serde(default)]
    pub context_query: Option<ContextQueryRef>,
}

impl SettingsObject {
    pub fn new(id: impl Into<String>, group: GroupId, weight: i64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: SettingsId::new(id),
            group,
            weight,
            secrets_group: None,
            context_query: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_secrets_group(mut self, secrets_group: SecretsGroupId) -> Self {
        self.secrets_group = Some(secrets_group);
        self
    }

    pub fn with_context_query(mut self, query: ContextQueryRef) -> Self {
        self.context_query = Some(query);
        self
    }
}
