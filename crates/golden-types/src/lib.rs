//! Golden Config Types - Core types for settings resolution and push artifacts
//!
//! These types describe the fleet as seen by the post-processing core. They
//! are owned by external systems (the device directory, the secrets backend)
//! and are read-only here.
//!
//! ## Key Concepts
//!
//! - **Device**: a managed network device with a platform and directory attributes
//! - **Group**: a stored device-selection filter; an empty filter matches every device
//! - **SettingsObject**: per-group configuration with a precedence `weight`
//! - **SecretsGroup**: named set of secret associations keyed by access and secret type
//! - **Principal**: the caller on whose behalf secrets are resolved
//! - **ScopeParams**: job parameters narrowing the device scope
//! - **IntendedConfigArtifact**: the stored intended configuration of one device

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod artifact;
pub mod device;
pub mod error;
pub mod group;
pub mod ids;
pub mod principal;
pub mod scope;
pub mod secrets;
pub mod settings;

// Re-export main types
pub use artifact::IntendedConfigArtifact;
pub use device::{Device, DeviceField};
pub use error::TypeError;
pub use group::{Group, GroupFilter};
pub use ids::{DeviceId, GroupId, SecretsGroupId, SettingsId};
pub use principal::Principal;
pub use scope::{DeviceSelection, ScopeParams};
pub use secrets::{AccessType, SecretAssociation, SecretRef, SecretType, SecretsGroup};
pub use settings::{ContextQueryRef, SettingsObject};
