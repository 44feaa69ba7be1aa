//! Push-artifact pipeline
//!
//! Stages run in the order they are named; each receives the previous
//! output. Names with no registered stage are skipped. The first failing
//! stage ends the run and its message becomes the artifact, prefixed with
//! [`PUSH_ERROR_PREFIX`], since artifacts are usually shown straight to an
//! operator.

use crate::config::{PipelineConfig, PostprocessingConfig};
use crate::error::{ConfigError, Result};
use crate::registry::StageRegistry;
use crate::stages::{RemoveLinesStage, RenderSecretsStage};
use golden_directory::DeviceDirectory;
use golden_render::TemplateRenderer;
use golden_types::{IntendedConfigArtifact, Principal};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

/// Returned instead of an artifact when post-processing is switched off
pub const DISABLED_MESSAGE: &str =
    "Generation of intended configurations postprocessing is not enabled, check your configuration.";

/// Prefix of the artifact returned when a stage fails
pub const PUSH_ERROR_PREFIX: &str = "Found an error rendering the configuration to push: ";

/// Ordered stage execution over a device's intended configuration
#[derive(Clone)]
pub struct PushPipeline {
    registry: StageRegistry,
    config: PostprocessingConfig,
}

impl PushPipeline {
    /// Register the built-in stages followed by the configured extra ones
    pub fn new(
        renderer: TemplateRenderer,
        directory: Arc<dyn DeviceDirectory>,
        config: PipelineConfig,
    ) -> std::result::Result<Self, ConfigError> {
        let mut registry = StageRegistry::new();
        registry.register(Arc::new(RenderSecretsStage::new(renderer, directory)));

        let remove_lines = RemoveLinesStage::new(config.postprocessing.compile_remove_lines()?);
        if !remove_lines.is_empty() {
            registry.register(Arc::new(remove_lines));
        }

        for stage in config.extra_stages {
            registry.register(stage);
        }

        info!(stages = ?registry.names(), "Push pipeline ready");
        Ok(Self {
            registry,
            config: config.postprocessing,
        })
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PostprocessingConfig {
        &self.config
    }

    /// Run `stage_names` (or the subscribed stages) and return the artifact
    ///
    /// Never fails: stage errors and a disabled pipeline both yield a
    /// readable message in place of the artifact.
    #[instrument(skip_all, fields(device = %intended.device.name, user = %principal))]
    pub fn build_push_artifact(
        &self,
        intended: &IntendedConfigArtifact,
        principal: &Principal,
        stage_names: Option<&[String]>,
    ) -> String {
        if !self.config.enabled {
            debug!("Post-processing disabled");
            return DISABLED_MESSAGE.to_string();
        }

        let stage_names = stage_names.unwrap_or(self.config.subscribed.as_slice());
        match self.run_stages(intended, principal, stage_names) {
            Ok(artifact) => artifact,
            Err(err) => {
                warn!(error = %err, "Stage failed; returning error message as artifact");
                format!("{PUSH_ERROR_PREFIX}{err}")
            }
        }
    }

    /// Run the named stages, stopping at the first failure
    pub fn run_stages(
        &self,
        intended: &IntendedConfigArtifact,
        principal: &Principal,
        stage_names: &[String],
    ) -> Result<String> {
        let mut current = String::new();
        for name in stage_names {
            let Some(stage) = self.registry.get(name) else {
                debug!(stage = %name, "No stage registered under this name; skipping");
                continue;
            };
            debug!(stage = %name, "Running stage");
            current = stage.apply(&current, intended, principal)?;
        }
        Ok(current)
    }

    /// Build artifacts for many devices on the blocking pool
    ///
    /// At most `max_concurrency` devices are processed at once. Results are
    /// returned in input order.
    pub async fn build_push_artifacts(
        &self,
        artifacts: Vec<IntendedConfigArtifact>,
        principal: &Principal,
    ) -> Vec<String> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency()));
        let pipeline = Arc::new(self.clone());
        info!(
            devices = artifacts.len(),
            concurrency = self.config.concurrency(),
            "Building push artifacts"
        );

        let mut handles = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    handles.push(Err(err.to_string()));
                    continue;
                }
            };
            let pipeline = Arc::clone(&pipeline);
            let principal = principal.clone();
            handles.push(Ok(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                pipeline.build_push_artifact(&artifact, &principal, None)
            })));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle {
                Ok(task) => task.await.map_err(|err| err.to_string()),
                Err(err) => Err(err),
            };
            results.push(result.unwrap_or_else(|err| {
                warn!(error = %err, "Push artifact worker failed");
                format!("{PUSH_ERROR_PREFIX}{err}")
            }));
        }
        results
    }
}
