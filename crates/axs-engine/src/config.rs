//! Engine configuration

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::EngineError;

/// Tunables shared by every rule table
///
/// Missing fields take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Delay before a newly created live region accepts text
    pub settle_delay_ms: u64,
    /// Delay before announced text is cleared again
    pub clear_delay_ms: u64,
    /// Prefix for generated element ids
    pub id_prefix: String,
    /// Attribute holding each cell's last seen state
    pub cell_marker: String,
    /// Live region used for move announcements
    pub announce_region: String,
    /// Mutation batches drained in one turn before giving up, at least 1
    #[serde(deserialize_with = "at_least_one")]
    pub feedback_limit: usize,
}

impl EngineConfig {
    /// Parse a JSON config
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match usize::deserialize(deserializer)? {
        0 => Err(serde::de::Error::custom("feedback_limit must be at least 1")),
        n => Ok(n),
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 134,
            clear_delay_ms: 1000,
            id_prefix: "axsg-".into(),
            cell_marker: "data-axs-cell".into(),
            announce_region: "axs-announce-new-stone".into(),
            feedback_limit: 64,
        }
    }
}
