//! Caller identity
//!
//! A Principal is whoever a render or secret lookup runs on behalf of.
//! Capabilities are not stored here; they are answered by the
//! authorization oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user, superuser or anonymous caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub authenticated: bool,
    pub superuser: bool,
}

impl Principal {
    /// An unauthenticated caller
    pub fn anonymous() -> Self {
        Self {
            username: "anonymous".into(),
            authenticated: false,
            superuser: false,
        }
    }

    /// A regular authenticated user
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            authenticated: true,
            superuser: false,
        }
    }

    /// An authenticated user with elevated status
    pub fn superuser(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            authenticated: true,
            superuser: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_superuser(&self) -> bool {
        self.superuser
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}
