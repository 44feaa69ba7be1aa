//! Stage abstraction

use crate::error::Result;
use golden_types::{IntendedConfigArtifact, Principal};
use std::fmt;

/// One named transformation step of the pipeline
pub trait PushStage: Send + Sync {
    /// Name used to select the stage
    fn name(&self) -> &str;

    /// Transform `current` into the next output
    fn apply(
        &self,
        current: &str,
        configs: &IntendedConfigArtifact,
        principal: &Principal,
    ) -> Result<String>;
}

/// Stage backed by a closure
pub struct FnStage<F> {
    name: String,
    func: F,
}

impl<F> FnStage<F>
where
    F: Fn(&str, &IntendedConfigArtifact, &Principal) -> Result<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> PushStage for FnStage<F>
where
    F: Fn(&str, &IntendedConfigArtifact, &Principal) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(
        &self,
        current: &str,
        configs: &IntendedConfigArtifact,
        principal: &Principal,
    ) -> Result<String> {
        (self.func)(current, configs, principal)
    }
}

impl<F> fmt::Debug for FnStage<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStage").field("name", &self.name).finish()
    }
}
