//! Error types for rendering

use golden_directory::ContextError;
use thiserror::Error;

/// Template rendering errors
///
/// Syntax, undefined-variable and generic errors carry the template text so
/// the failure can be reported next to the offending source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template has a syntax error at line number {line}, check the template for invalid syntax: {message}")]
    Syntax {
        line: usize,
        message: String,
        template: String,
    },

    #[error("Template uses an undefined variable: {message}; check the template for missing variable definitions")]
    Undefined { message: String, template: String },

    #[error("Template failed with an unexpected error: {message}; check the template for correctness")]
    Generic { message: String, template: String },

    #[error("No intended configuration is available. Before rendering the configuration with postprocessing, you need to generate the intended configuration.")]
    NoReferenceConfiguration,

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl TemplateError {
    /// Template source attached to the error, if any
    pub fn template(&self) -> Option<&str> {
        match self {
            TemplateError::Syntax { template, .. }
            | TemplateError::Undefined { template, .. }
            | TemplateError::Generic { template, .. } => Some(template),
            _ => None,
        }
    }

    /// Message with the template source appended, for job logs
    pub fn log_message(&self) -> String {
        match self.template() {
            Some(template) => format!("{self}\nTemplate:\n{template}"),
            None => self.to_string(),
        }
    }
}

/// Credential helper errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Password must not exceed {max} characters for type 7 encryption")]
    PasswordTooLong { max: usize },

    #[error("Salt {0} is out of range for type 7 encryption (0-15)")]
    InvalidSalt(i64),

    #[error("Invalid type 7 encrypted value: {0}")]
    InvalidEncrypted(String),

    #[error("Type 5 hashing failed: {0}")]
    Hash(String),
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, TemplateError>;
