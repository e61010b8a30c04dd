//! Global check policy.

use std::time::Duration;

use crate::config::{DecodeFailurePolicy, ProbeSettings};

/// Cadence and limits applied to every target.
///
/// `timeout < interval` keeps rounds from overrunning but is not enforced;
/// the scheduler skips ticks that fire while a round is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    pub max_body_bytes: usize,
    pub decode_failure: DecodeFailurePolicy,
}

impl MonitorPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout,
            ..Self::default()
        }
    }

    pub fn with_decode_failure(mut self, policy: DecodeFailurePolicy) -> Self {
        self.decode_failure = policy;
        self
    }
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        MonitorPolicy::from(&ProbeSettings::default())
    }
}

impl From<&ProbeSettings> for MonitorPolicy {
    fn from(settings: &ProbeSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.interval_ms),
            timeout: Duration::from_millis(settings.timeout_ms),
            max_body_bytes: settings.max_body_bytes,
            decode_failure: settings.decode_failure,
        }
    }
}
