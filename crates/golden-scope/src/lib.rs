//! # Golden Config Scope
//!
//! Decides which devices a job runs against and which settings object
//! applies to each of them.
//!
//! ## Key Components
//!
//! - [`map_devices_to_settings`]: weighted precedence over group memberships
//! - [`SettingsResolver`]: the same resolution backed by a device directory
//! - [`ScopeQueryBuilder`]: device selection from job parameters and the
//!   union of all configured groups
//!
//! ## Precedence
//!
//! A device may belong to many groups with settings attached. The settings
//! object with the highest `weight` wins; among equal weights the group with
//! the lowest identifier wins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use golden_directory::{FilterMembershipResolver, InMemoryDirectory};
//! use golden_scope::ScopeQueryBuilder;
//! use golden_types::{DeviceField, ScopeParams};
//!
//! let directory = Arc::new(InMemoryDirectory::new());
//! let builder = ScopeQueryBuilder::new(directory, Arc::new(FilterMembershipResolver::new()));
//!
//! let params = ScopeParams::new().with_field(DeviceField::Site, "site-a");
//! match builder.build_device_query(&params) {
//!     Ok(devices) => println!("{} devices in scope", devices.len()),
//!     Err(e) => println!("Scope rejected: {}", e),
//! }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod scope;
pub mod settings;

// Re-exports
pub use error::{Result, ScopeError};
pub use scope::ScopeQueryBuilder;
pub use settings::{map_devices_to_settings, select_settings, SettingsResolver};
