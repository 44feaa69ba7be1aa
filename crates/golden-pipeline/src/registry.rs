//! Named stage registry
//!
//! Stages are kept in registration order. Names are unique: registering a
//! name a second time keeps the first stage.

use crate::stage::PushStage;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::warn;

/// Registry of pipeline stages, keyed by name
#[derive(Clone, Default)]
pub struct StageRegistry {
    stages: IndexMap<String, Arc<dyn PushStage>>,
}

impl StageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage. Returns `false` if the name was already taken.
    pub fn register(&mut self, stage: Arc<dyn PushStage>) -> bool {
        let name = stage.name().to_string();
        if self.stages.contains_key(&name) {
            warn!(stage = %name, "Stage already registered; keeping the first registration");
            return false;
        }
        self.stages.insert(name, stage);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PushStage>> {
        self.stages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stages.contains_key(name)
    }

    /// Stage names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.stages.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
