//! # Golden Config Pipeline
//!
//! Turns a device's stored intended configuration into the artifact that is
//! pushed to (or shown for) the device, by running an ordered list of named
//! stages.
//!
//! ## Stages
//!
//! Every stage has the same shape: it receives the previous stage's output,
//! the device's [`IntendedConfigArtifact`](golden_types::IntendedConfigArtifact)
//! and the calling principal, and returns the next output. Built-in stages:
//!
//! - `render_secrets`: secret-aware render, starting from the stored
//!   intended configuration when there is no previous output
//! - `remove_lines`: drops lines matching per-platform patterns (only
//!   registered when rules are configured)
//!
//! Extra stages are supplied through [`PipelineConfig`]. A stage failure
//! stops the run and the pipeline returns a readable error string instead of
//! the artifact.
//!
//! ## Example
//!
//! ```rust,ignore
//! let pipeline = PushPipeline::new(renderer, directory, PipelineConfig::default())?;
//! let artifact = pipeline.build_push_artifact(&intended, &principal, None);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod stage;
pub mod stages;

// Re-exports
pub use config::{PipelineConfig, PostprocessingConfig};
pub use error::{ConfigError, RenderConfigToPushError, Result};
pub use pipeline::{PushPipeline, DISABLED_MESSAGE, PUSH_ERROR_PREFIX};
pub use registry::StageRegistry;
pub use stage::{FnStage, PushStage};
pub use stages::{RemoveLinesStage, RenderSecretsStage, REMOVE_LINES, RENDER_SECRETS};
