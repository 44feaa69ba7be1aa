//! Error types for the pipeline

use golden_render::TemplateError;
use golden_scope::ScopeError;
use thiserror::Error;

/// A stage could not produce its output
///
/// Carries only the message of the underlying failure, so stages need not
/// share an error model with the rendering engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderConfigToPushError {
    message: String,
}

impl RenderConfigToPushError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TemplateError> for RenderConfigToPushError {
    fn from(err: TemplateError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<ScopeError> for RenderConfigToPushError {
    fn from(err: ScopeError) -> Self {
        Self::new(err.to_string())
    }
}

/// Pipeline configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid remove_lines pattern {pattern:?} for platform {platform}: {source}")]
    Pattern {
        platform: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for stage execution
pub type Result<T> = std::result::Result<T, RenderConfigToPushError>;
