//! Pipeline configuration

use crate::error::ConfigError;
use crate::stage::PushStage;
use crate::stages::RENDER_SECRETS;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Post-processing settings, usually read from TOML
///
/// ```toml
/// enabled = true
/// subscribed = ["render_secrets", "remove_lines"]
/// max_concurrency = 4
///
/// [remove_lines]
/// cisco_ios = ['^enable secret.*\n', '^username \S+ secret.*\n']
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostprocessingConfig {
    /// Run the pipeline at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Stage names run when the caller does not pick any
    #[serde(default = "default_subscribed")]
    pub subscribed: Vec<String>,

    /// Devices processed at once by the batch driver
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Line removal patterns keyed by platform, compiled multi-line
    #[serde(default)]
    pub remove_lines: BTreeMap<String, Vec<String>>,
}

impl Default for PostprocessingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            subscribed: default_subscribed(),
            max_concurrency: default_max_concurrency(),
            remove_lines: BTreeMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_subscribed() -> Vec<String> {
    vec![RENDER_SECRETS.to_string()]
}

fn default_max_concurrency() -> usize {
    8
}

impl PostprocessingConfig {
    /// Parse from a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Worker pool size, never below one
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// Compile the line removal patterns with `^`/`$` matching at line breaks
    pub fn compile_remove_lines(&self) -> Result<BTreeMap<String, Vec<Regex>>, ConfigError> {
        let mut compiled = BTreeMap::new();
        for (platform, patterns) in &self.remove_lines {
            let regexes = patterns
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(pattern)
                        .multi_line(true)
                        .build()
                        .map_err(|source| ConfigError::Pattern {
                            platform: platform.clone(),
                            pattern: pattern.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            compiled.insert(platform.clone(), regexes);
        }
        Ok(compiled)
    }
}

/// Everything needed to assemble a pipeline
#[derive(Clone, Default)]
pub struct PipelineConfig {
    pub postprocessing: PostprocessingConfig,

    /// Registered after the built-in stages
    pub extra_stages: Vec<Arc<dyn PushStage>>,
}

impl PipelineConfig {
    pub fn new(postprocessing: PostprocessingConfig) -> Self {
        Self {
            postprocessing,
            extra_stages: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: Arc<dyn PushStage>) -> Self {
        self.extra_stages.push(stage);
        self
    }
}
