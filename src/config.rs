/*!
 * Tree Configuration
 * Serde-backed settings with environment overrides
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::node::{TreeError, TreeResult};

/// Environment variable naming the sandbox root
pub const ENV_SANDBOX: &str = "DAVTREE_SANDBOX";
/// Environment variable selecting the invalidation policy (`strict` / `tolerant`)
pub const ENV_INVALIDATION: &str = "DAVTREE_INVALIDATION";
/// Environment variable sizing the event channel
pub const ENV_EVENT_CAPACITY: &str = "DAVTREE_EVENT_CAPACITY";

const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// What `delete` does when the parent invalidation hook fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Log the failure and report the delete as successful
    #[default]
    Tolerant,
    /// Fail the delete with the hook's error
    Strict,
}

impl std::str::FromStr for InvalidationPolicy {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tolerant" => Ok(InvalidationPolicy::Tolerant),
            "strict" => Ok(InvalidationPolicy::Strict),
            other => Err(TreeError::Config(format!(
                "unknown invalidation policy: {other:?}"
            ))),
        }
    }
}

/// Tree settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Sandbox root; `None` leaves the tree unrestricted
    pub sandbox: Option<PathBuf>,
    pub invalidation: InvalidationPolicy,
    /// Capacity of the change event channel
    pub event_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            sandbox: None,
            invalidation: InvalidationPolicy::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl TreeConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> TreeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| TreeError::Config(format!("invalid tree config: {e}")))
    }

    /// Build settings from an arbitrary key lookup
    ///
    /// Unparsable values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(sandbox) = lookup(ENV_SANDBOX).filter(|s| !s.trim().is_empty()) {
            config.sandbox = Some(PathBuf::from(sandbox));
        }

        if let Some(raw) = lookup(ENV_INVALIDATION) {
            match raw.parse() {
                Ok(policy) => config.invalidation = policy,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring {}", ENV_INVALIDATION),
            }
        }

        if let Some(raw) = lookup(ENV_EVENT_CAPACITY) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.event_capacity = capacity,
                _ => warn!(value = %raw, "Ignoring {}", ENV_EVENT_CAPACITY),
            }
        }

        config
    }
}
