//! Admission Controller Use Case
//!
//! Fixed-window counting per client identity. The counter for a window is
//! incremented atomically and given an expiry on its first increment; it is
//! never decremented. Because windows are fixed, a client can be admitted up
//! to twice the limit across a window boundary.

use gatehouse_domain::constants::ADMISSION_KEY_PREFIX;
use gatehouse_domain::error::Result;
use gatehouse_domain::ports::{CounterStore, KeyTtl};
use gatehouse_domain::value_objects::{
    AdmissionDecision, ClientIdentity, FailurePolicy, WindowPolicy,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Decides whether a request from an identity may proceed
#[derive(Clone)]
pub struct AdmissionController {
    counters: Arc<dyn CounterStore>,
    key_prefix: String,
    on_store_failure: FailurePolicy,
    enabled: bool,
}

impl AdmissionController {
    /// Create a controller over the given counter store
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self {
            counters,
            key_prefix: ADMISSION_KEY_PREFIX.to_string(),
            on_store_failure: FailurePolicy::default(),
            enabled: true,
        }
    }

    /// Use a different counter key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Choose what happens when the store is unreachable
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_store_failure = policy;
        self
    }

    /// Enable or disable admission control
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Counter key for an identity and window length
    pub fn counter_key(&self, identity: &ClientIdentity, window_secs: u64) -> String {
        format!("{}:{}:{}", self.key_prefix, window_secs, identity)
    }

    /// Admit or reject one request
    ///
    /// Store failures surface as `StoreUnavailable` under the closed policy.
    /// Under the open policy they are logged and the request is admitted.
    pub async fn admit(
        &self,
        identity: &ClientIdentity,
        policy: WindowPolicy,
    ) -> Result<AdmissionDecision> {
        if !self.enabled {
            return Ok(AdmissionDecision::Allowed {
                count: 0,
                remaining: policy.limit,
            });
        }

        match self.check(identity, policy).await {
            Ok(decision) => Ok(decision),
            Err(e) if e.is_transient() && self.on_store_failure == FailurePolicy::Open => {
                warn!(
                    identity = %identity,
                    error = %e,
                    "Admission store unavailable, admitting request"
                );
                Ok(AdmissionDecision::Allowed {
                    count: 0,
                    remaining: policy.limit,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn check(
        &self,
        identity: &ClientIdentity,
        policy: WindowPolicy,
    ) -> Result<AdmissionDecision> {
        let key = self.counter_key(identity, policy.window_secs());
        let count = self.counters.increment(&key).await?;

        if count == 1 {
            // A crash before this call leaves a counter that never expires.
            self.counters.expire(&key, policy.window).await?;
        }

        if count > policy.limit {
            let retry_after = self.retry_after(&key, policy.window).await?;
            info!(
                identity = %identity,
                count,
                limit = policy.limit,
                retry_after_secs = retry_after.as_secs(),
                "Request rejected"
            );
            return Ok(AdmissionDecision::Rejected {
                count,
                limit: policy.limit,
                retry_after,
            });
        }

        debug!(identity = %identity, count, limit = policy.limit, "Request admitted");
        Ok(AdmissionDecision::Allowed {
            count,
            remaining: policy.limit - count,
        })
    }

    async fn retry_after(&self, key: &str, window: Duration) -> Result<Duration> {
        match self.counters.ttl(key).await? {
            KeyTtl::Expires(remaining) => Ok(remaining),
            KeyTtl::Persistent => {
                warn!(key, "Window counter has no expiry and will not reset on its own");
                Ok(window)
            }
            // Window ended between the increment and this lookup
            KeyTtl::Missing => Ok(Duration::ZERO),
        }
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("key_prefix", &self.key_prefix)
            .field("on_store_failure", &self.on_store_failure)
            .field("enabled", &self.enabled)
            .finish()
    }
}
