//! # Golden Config Render
//!
//! Renders intended configurations into push artifacts, substituting
//! runtime secrets only for callers allowed to read them.
//!
//! ## Key Components
//!
//! - [`SecretResolver`]: permission-gated secret lookup. Denials are a normal
//!   string result so templates can embed them inline.
//! - [`BoundSecretResolver`]: a resolver with the calling principal fixed,
//!   registered as the `get_secret_by_secret_group_slug` template filter
//! - [`filters`]: network credential helpers; only `encrypt_type5` and
//!   `encrypt_type7` are exposed next to the secret filter
//! - [`TemplateRenderer`]: the rendering engine and its error classification
//!
//! ## Template usage
//!
//! ```text
//! username admin secret {{ secrets_group | get_secret_by_secret_group_slug("password") | encrypt_type5 }}
//! snmp-server community {{ "snmp" | get_secret_by_secret_group_slug("token", "SNMP") }}
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod engine;
pub mod error;
pub mod filters;
pub mod log;
pub mod secrets;

// Re-exports
pub use engine::{TemplateRenderer, SECRET_FILTER};
pub use error::{FilterError, Result, TemplateError};
pub use filters::{FILTER_CATALOG, SECRET_RENDER_FILTERS};
pub use log::{FailureLog, TracingFailureLog};
pub use secrets::{denial_message, BoundSecretResolver, SecretResolver};
