//! Work queue records and cursors

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// String attributes of a work item
pub type WorkItemAttributes = BTreeMap<String, String>;

/// Log-assigned identifier of a work item
///
/// Formatted `<millis>-<seq>`. Ordering compares the millisecond part first
/// and the sequence second, so it matches append order within one log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WorkItemId {
    millis: u64,
    seq: u64,
}

impl WorkItemId {
    /// Smallest possible id (`0-0`), never assigned to an item
    pub const MIN: Self = Self { millis: 0, seq: 0 };

    /// Build an id from its parts
    pub const fn new(millis: u64, seq: u64) -> Self {
        Self { millis, seq }
    }

    /// Millisecond part
    pub fn millis(&self) -> u64 {
        self.millis
    }

    /// Sequence part
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Next id strictly greater than `self` for an append at `now_millis`
    pub fn successor(&self, now_millis: u64) -> Self {
        if now_millis > self.millis {
            Self::new(now_millis, 0)
        } else {
            Self::new(self.millis, self.seq + 1)
        }
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.millis, self.seq)
    }
}

impl FromStr for WorkItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::malformed_input(format!("Invalid work item id: '{s}'"));
        let (millis, seq) = match s.split_once('-') {
            Some((millis, seq)) => (millis, seq),
            None => (s, "0"),
        };
        let millis = millis.parse::<u64>().map_err(|_| invalid())?;
        let seq = seq.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self::new(millis, seq))
    }
}

impl Serialize for WorkItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Immutable record read from a log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Log-assigned id
    pub id: WorkItemId,
    /// String attributes
    pub attributes: WorkItemAttributes,
}

impl WorkItem {
    /// Create a work item
    pub fn new(id: WorkItemId, attributes: WorkItemAttributes) -> Self {
        Self { id, attributes }
    }

    /// Look up one attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Position used by tailing reads and group creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPosition {
    /// Beginning of the log (`0`)
    Start,
    /// Only entries appended from now on (`$`)
    Latest,
    /// Entries strictly after the given id
    After(WorkItemId),
}

impl StreamPosition {
    /// Wire form understood by the log store
    pub fn as_wire(&self) -> String {
        match self {
            Self::Start => "0".to_string(),
            Self::Latest => "$".to_string(),
            Self::After(id) => id.to_string(),
        }
    }
}

/// Which entries a group read returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupReadMode {
    /// Entries never delivered to the group (`>`)
    New,
    /// Entries already delivered to this consumer, still pending, with an id
    /// greater than the given one
    PendingAfter(WorkItemId),
}

impl GroupReadMode {
    /// This consumer's whole pending history
    pub fn own_pending() -> Self {
        Self::PendingAfter(WorkItemId::MIN)
    }

    /// Wire form understood by the log store
    pub fn as_wire(&self) -> String {
        match self {
            Self::New => ">".to_string(),
            Self::PendingAfter(id) => id.to_string(),
        }
    }
}

/// Entry delivered to a group consumer but not yet acknowledged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    /// Item id
    pub id: WorkItemId,
    /// Consumer currently owning the entry
    pub consumer: String,
    /// Time since the last delivery
    pub idle: Duration,
    /// Number of times the entry was delivered
    pub delivery_count: u64,
}
