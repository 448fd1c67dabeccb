//! Timestamp type read from the chain clock.
//!
//! Timestamps are seconds. The engine never produces them itself; they come
//! from a clock oracle at call time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time, in seconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether strictly more than `duration_secs` has elapsed by `now`. At
    /// exactly `duration_secs` the period is still running.
    pub fn has_expired(&self, duration_secs: u64, now: Timestamp) -> bool {
        self.elapsed_since(now) > duration_secs
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
