//! Cache invalidation notices

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Message published on the invalidation channel
///
/// The wire payload is either a JSON object `{"keys": [...]}`, a JSON array of
/// keys, or a bare key. An empty payload names no keys; listeners then fall
/// back to their configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationNotice {
    /// Cache keys to evict
    #[serde(default)]
    pub keys: Vec<String>,
}

impl InvalidationNotice {
    /// Notice naming the given keys
    pub fn for_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a payload received from the channel
    pub fn parse(payload: &str) -> Result<Self> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed).map_err(|e| {
                Error::malformed_input(format!("Invalid invalidation payload: {e}"))
            });
        }
        if trimmed.starts_with('[') {
            let keys: Vec<String> = serde_json::from_str(trimmed).map_err(|e| {
                Error::malformed_input(format!("Invalid invalidation key list: {e}"))
            })?;
            return Ok(Self { keys });
        }
        Ok(Self::for_keys([trimmed]))
    }

    /// Serialize for publishing
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the notice names no key
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
