//! Golden Config Directory - collaborator seams and in-memory implementations
//!
//! The post-processing core reads from systems it does not own:
//!
//! - **DeviceDirectory**: devices, groups, settings objects and secrets groups
//! - **GroupMembershipResolver**: turns a stored group filter into a [`DevicePredicate`]
//! - **ContextQueryExecutor**: runs a context query against a device
//! - **AuthorizationOracle**: answers capability checks for a principal
//! - **SecretStore**: resolves a secret value out of a secrets group
//!
//! Device queries are expressed with [`DevicePredicate`], composed through
//! AND/OR combinators.
//!
//! ## In-Memory vs Persistent
//!
//! The crate provides in-memory implementations suitable for development and
//! testing, plus an environment-variable secret provider. Production
//! deployments plug their own backends into the same traits.
//!
//! All traits are synchronous: every call is a blocking lookup, and callers
//! that need concurrency run them on a blocking worker pool.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod authz;
pub mod context;
pub mod directory;
pub mod error;
pub mod membership;
pub mod memory;
pub mod predicate;
pub mod secrets;

// Re-exports
pub use authz::{AuthorizationOracle, VIEW_SECRETS_GROUP};
pub use context::{ContextData, ContextQueryExecutor};
pub use directory::DeviceDirectory;
pub use error::{ContextError, DirectoryError, Result, SecretError};
pub use membership::{FilterMembershipResolver, GroupMembershipResolver};
pub use memory::{
    EnvironmentSecretStore, InMemoryDirectory, StaticAuthorizationOracle, StaticContextExecutor,
    ENVIRONMENT_PROVIDER,
};
pub use predicate::DevicePredicate;
pub use secrets::SecretStore;
