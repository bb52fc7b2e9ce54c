//! Push configuration.
//!
//! The heartbeat bounds are protocol policy. They are configurable so that
//! deployments can be tested against real servers, but the defaults are the
//! values every account should run with.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Heartbeat used when an account has no persisted value (8 minutes).
pub const DEFAULT_HEARTBEAT_SECS: u64 = 8 * 60;

/// Smallest heartbeat ever requested (8 minutes).
pub const MIN_HEARTBEAT_SECS: u64 = 8 * 60;

/// Largest heartbeat ever requested (28 minutes).
pub const MAX_HEARTBEAT_SECS: u64 = 28 * 60;

/// Largest change applied by a single adjustment (5 minutes).
pub const MAX_HEARTBEAT_STEP_SECS: u64 = 5 * 60;

/// Extra time on top of the heartbeat before the client gives up.
pub const REQUEST_SLACK_SECS: u64 = 5;

/// Bounds and step size for the adaptive heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatPolicy {
    /// Heartbeat used when nothing has been persisted, in seconds.
    pub default_secs: u64,
    /// Lower bound, in seconds.
    pub min_secs: u64,
    /// Upper bound, in seconds.
    pub max_secs: u64,
    /// Largest single adjustment, in seconds.
    pub max_step_secs: u64,
    /// Slack added to the heartbeat for the client-side timeout, in seconds.
    pub request_slack_secs: u64,
}

impl Default for HeartbeatPolicy {
    fn default() -> Self {
        Self {
            default_secs: DEFAULT_HEARTBEAT_SECS,
            min_secs: MIN_HEARTBEAT_SECS,
            max_secs: MAX_HEARTBEAT_SECS,
            max_step_secs: MAX_HEARTBEAT_STEP_SECS,
            request_slack_secs: REQUEST_SLACK_SECS,
        }
    }
}

impl HeartbeatPolicy {
    /// Clamps a heartbeat into `[min_secs, max_secs]`.
    ///
    /// Never panics, even for a policy that fails [`Self::validate`].
    #[must_use]
    pub fn clamp(&self, secs: u64) -> u64 {
        secs.max(self.min_secs).min(self.max_secs)
    }

    /// Slack added to the heartbeat for the client-side timeout.
    #[must_use]
    pub const fn request_slack(&self) -> Duration {
        Duration::from_secs(self.request_slack_secs)
    }

    /// Checks that the policy is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the bounds are inverted, zero, or the
    /// default lies outside them, or if the step or slack is zero.
    pub fn validate(&self) -> Result<()> {
        if self.min_secs == 0 {
            return Err(Error::Config("heartbeat min_secs must be positive".to_string()));
        }
        if self.min_secs > self.max_secs {
            return Err(Error::Config(format!(
                "heartbeat min_secs ({}) exceeds max_secs ({})",
                self.min_secs, self.max_secs
            )));
        }
        if !(self.min_secs..=self.max_secs).contains(&self.default_secs) {
            return Err(Error::Config(format!(
                "heartbeat default_secs ({}) outside [{}, {}]",
                self.default_secs, self.min_secs, self.max_secs
            )));
        }
        if self.max_step_secs == 0 {
            return Err(Error::Config(
                "heartbeat max_step_secs must be positive".to_string(),
            ));
        }
        if self.request_slack_secs == 0 {
            return Err(Error::Config(
                "request_slack_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the push (Ping) operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Heartbeat policy.
    pub heartbeat: HeartbeatPolicy,
}

impl PushConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the policy is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.heartbeat.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, falling back to defaults if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            tracing::debug!(path = %path.display(), "push config not found, using defaults");
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }
}
