//! Adaptive heartbeat for the Ping long-poll.
//!
//! The heartbeat is how long the server is asked to hold the request before
//! answering "nothing changed". A clean server-side expiry is evidence the
//! path can sustain a longer hold, so the heartbeat grows by one step. A
//! failure backs it off by one step. A server correction is adopted directly.
//! Every result stays within the policy bounds.
//!
//! The controller is pure in-memory state. Callers persist the value after
//! each [`HeartbeatChange`].

use std::time::Duration;

use tracing::debug;

use crate::config::HeartbeatPolicy;

/// Result of a heartbeat mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatChange {
    /// Heartbeat before the mutation, in seconds.
    pub previous: u64,
    /// Heartbeat after the mutation, in seconds.
    pub current: u64,
}

impl HeartbeatChange {
    /// Returns true if the mutation changed the value.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Owns the heartbeat of one account.
#[derive(Debug, Clone)]
pub struct HeartbeatController {
    policy: HeartbeatPolicy,
    current: u64,
}

impl HeartbeatController {
    /// Creates a controller from a persisted value.
    ///
    /// `None` and `Some(0)` mean nothing was persisted and yield the policy
    /// default. Any other value is clamped into the policy bounds.
    #[must_use]
    pub fn new(policy: HeartbeatPolicy, persisted: Option<u64>) -> Self {
        let current = match persisted {
            None | Some(0) => policy.clamp(policy.default_secs),
            Some(secs) => policy.clamp(secs),
        };
        Self { policy, current }
    }

    /// Current heartbeat in seconds.
    #[must_use]
    pub const fn current_secs(&self) -> u64 {
        self.current
    }

    /// Current heartbeat as a duration.
    #[must_use]
    pub const fn current(&self) -> Duration {
        Duration::from_secs(self.current)
    }

    /// The policy this controller enforces.
    #[must_use]
    pub const fn policy(&self) -> &HeartbeatPolicy {
        &self.policy
    }

    /// Client-side deadline for one long-poll.
    ///
    /// Always longer than the heartbeat, so a normal server expiry reaches the
    /// client before its own deadline fires.
    #[must_use]
    pub fn timeout_for_request(&self) -> Duration {
        let slack = self.policy.request_slack().max(Duration::from_secs(1));
        self.current().saturating_add(slack)
    }

    /// The long-poll completed without a classified status that tunes the
    /// heartbeat. Leaves the value unchanged.
    pub fn on_timeout_expired(&self) -> u64 {
        debug!(heartbeat = self.current, "heartbeat kept");
        self.current
    }

    /// Backs off one step after a failed long-poll.
    pub fn on_operation_failure(&mut self) -> HeartbeatChange {
        let previous = self.current;
        self.current = self
            .policy
            .clamp(previous.saturating_sub(self.policy.max_step_secs));
        debug!(
            step = self.policy.max_step_secs,
            previous,
            heartbeat = self.current,
            "heartbeat decreased"
        );
        HeartbeatChange {
            previous,
            current: self.current,
        }
    }

    /// Grows one step after the server reported a clean expiry.
    pub fn increase(&mut self) -> HeartbeatChange {
        let previous = self.current;
        self.current = self
            .policy
            .clamp(previous.saturating_add(self.policy.max_step_secs));
        debug!(
            step = self.policy.max_step_secs,
            previous,
            heartbeat = self.current,
            "heartbeat increased"
        );
        HeartbeatChange {
            previous,
            current: self.current,
        }
    }

    /// Adopts a heartbeat dictated by the server, clamped into the policy
    /// bounds. Not limited by the step size.
    pub fn force_set(&mut self, server_secs: u64) -> HeartbeatChange {
        let previous = self.current;
        self.current = self.policy.clamp(server_secs);
        debug!(
            server = server_secs,
            previous,
            heartbeat = self.current,
            "heartbeat set by server"
        );
        HeartbeatChange {
            previous,
            current: self.current,
        }
    }
}
