//! Admission control value objects

use crate::constants::{ADMISSION_LIMIT, ADMISSION_WINDOW_SECS, FALLBACK_IDENTITY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Opaque identity of a caller
///
/// Usually the peer network address. It is only used to build counter keys
/// and is never persisted beyond the lifetime of a window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Create an identity from any string
    pub fn new<S: Into<String>>(identity: S) -> Self {
        Self(identity.into())
    }

    /// Identity from an optional peer address, falling back to loopback
    pub fn from_peer(addr: Option<IpAddr>) -> Self {
        match addr {
            Some(ip) => Self(ip.to_string()),
            None => Self(FALLBACK_IDENTITY.to_string()),
        }
    }

    /// Borrow the identity string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientIdentity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClientIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Fixed-window admission policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    /// Window length
    pub window: Duration,
    /// Requests admitted per identity and window
    pub limit: u64,
}

impl WindowPolicy {
    /// Create a policy from a window length in seconds and a limit
    pub fn new(window_secs: u64, limit: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs),
            limit,
        }
    }

    /// Window length in whole seconds
    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::new(ADMISSION_WINDOW_SECS, ADMISSION_LIMIT)
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AdmissionDecision {
    /// The request may proceed
    Allowed {
        /// Post-increment counter value
        count: u64,
        /// Requests left in the current window
        remaining: u64,
    },
    /// The identity exhausted its quota for the current window
    Rejected {
        /// Post-increment counter value
        count: u64,
        /// Configured limit
        limit: u64,
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl AdmissionDecision {
    /// Whether the request was admitted
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Retry hint for rejected requests
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Allowed { .. } => None,
            Self::Rejected { retry_after, .. } => Some(*retry_after),
        }
    }
}

/// What the admission controller does when the store cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Admit the request and log a warning
    Open,
    /// Propagate the store error to the caller
    #[default]
    Closed,
}
