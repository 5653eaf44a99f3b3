//! Admission control configuration types

use gatehouse_domain::constants::{ADMISSION_KEY_PREFIX, ADMISSION_LIMIT, ADMISSION_WINDOW_SECS};
use gatehouse_domain::value_objects::{FailurePolicy, WindowPolicy};
use serde::{Deserialize, Serialize};

/// Admission control configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Check requests against the window counter
    pub enabled: bool,
    /// Window length in seconds
    pub window_secs: u64,
    /// Requests admitted per identity and window
    pub limit: u64,
    /// Counter key prefix
    pub key_prefix: String,
    /// Behaviour when the store is unreachable ("open" or "closed")
    pub on_store_failure: FailurePolicy,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: ADMISSION_WINDOW_SECS,
            limit: ADMISSION_LIMIT,
            key_prefix: ADMISSION_KEY_PREFIX.to_string(),
            on_store_failure: FailurePolicy::default(),
        }
    }
}

impl AdmissionConfig {
    /// Window policy applied to every request
    pub fn policy(&self) -> WindowPolicy {
        WindowPolicy::new(self.window_secs, self.limit)
    }
}
