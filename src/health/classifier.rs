//! Outcome classification.
//!
//! # Responsibilities
//! - Map every [`ProbeOutcome`] to exactly one named condition per check kind
//! - Write the metric transitions each condition implies
//!
//! # Liveness (`/health`)
//! ```text
//! DeadlineExceeded           → health_timeout = 1
//! TransportFailure           → health_failure = 1
//! Success, body undecodable  → nothing (preserve) | health_decode_failure = 1 (flag)
//! Success, body incomplete   → same as undecodable
//! Success, status == "UP"    → service_up = 1, up_since = uptime
//! Success, other status      → service_up = 0, up_since = uptime
//! ```
//!
//! # Workload (`/work`)
//! ```text
//! DeadlineExceeded   → app_timeout = 1
//! TransportFailure   → app_unreachable = 1
//! Success, non-2xx   → failure_count += 1
//! Success, 2xx       → app_latency = elapsed µs (body ignored)
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::config::DecodeFailurePolicy;
use crate::health::probe::ProbeOutcome;
use crate::observability::{Metric, MetricSink};

/// Status string a healthy service reports.
pub const STATUS_UP: &str = "UP";

/// Payload of the `/health` route.
///
/// Missing or `null` fields decode to their defaults; only malformed JSON
/// is a decode failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LivenessReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(default, rename = "uptime_sec", deserialize_with = "null_as_default")]
    pub uptime_secs: f64,

    #[serde(default)]
    pub version: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Condition recorded by one liveness check.
#[derive(Debug, Clone, PartialEq)]
pub enum LivenessVerdict {
    DeadlineExceeded,
    TransportFailure { reason: String },
    DecodeFailure { reason: String },
    Up { uptime_secs: f64 },
    Down { status: String, uptime_secs: f64 },
}

/// Condition recorded by one workload check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadVerdict {
    DeadlineExceeded,
    TransportFailure,
    BadStatus { status: u16 },
    Success { latency: Duration },
}

pub fn classify_liveness(outcome: &ProbeOutcome) -> LivenessVerdict {
    match outcome {
        ProbeOutcome::DeadlineExceeded { .. } => LivenessVerdict::DeadlineExceeded,
        ProbeOutcome::TransportFailure { reason, .. } => LivenessVerdict::TransportFailure {
            reason: reason.clone(),
        },
        ProbeOutcome::Success {
            body_complete: false,
            body,
            ..
        } => LivenessVerdict::DecodeFailure {
            reason: format!("body incomplete after {} bytes", body.len()),
        },
        ProbeOutcome::Success { body, .. } => match serde_json::from_slice::<LivenessReport>(body) {
            Err(e) => LivenessVerdict::DecodeFailure {
                reason: e.to_string(),
            },
            Ok(report) => {
                // Uptime is reported as-is even when the service says it is down.
                let uptime_secs = report.uptime_secs.max(0.0);
                if report.status == STATUS_UP {
                    LivenessVerdict::Up { uptime_secs }
                } else {
                    LivenessVerdict::Down {
                        status: report.status,
                        uptime_secs,
                    }
                }
            }
        },
    }
}

pub fn classify_workload(outcome: &ProbeOutcome) -> WorkloadVerdict {
    match outcome {
        ProbeOutcome::DeadlineExceeded { .. } => WorkloadVerdict::DeadlineExceeded,
        ProbeOutcome::TransportFailure { .. } => WorkloadVerdict::TransportFailure,
        ProbeOutcome::Success { status, elapsed, .. } => {
            if (200..=299).contains(status) {
                WorkloadVerdict::Success { latency: *elapsed }
            } else {
                WorkloadVerdict::BadStatus { status: *status }
            }
        }
    }
}

impl LivenessVerdict {
    /// Flags cleared before every liveness probe.
    pub fn reset<S: MetricSink + ?Sized>(sink: &S, app: &str, policy: DecodeFailurePolicy) {
        sink.set(Metric::HealthTimeout, app, 0.0);
        sink.set(Metric::HealthFailure, app, 0.0);
        if policy == DecodeFailurePolicy::Flag {
            sink.set(Metric::HealthDecodeFailure, app, 0.0);
        }
    }

    pub fn record<S: MetricSink + ?Sized>(&self, sink: &S, app: &str, policy: DecodeFailurePolicy) {
        match self {
            LivenessVerdict::DeadlineExceeded => sink.set(Metric::HealthTimeout, app, 1.0),
            LivenessVerdict::TransportFailure { .. } => sink.set(Metric::HealthFailure, app, 1.0),
            LivenessVerdict::DecodeFailure { .. } => {
                if policy == DecodeFailurePolicy::Flag {
                    sink.set(Metric::HealthDecodeFailure, app, 1.0);
                }
            }
            LivenessVerdict::Up { uptime_secs } => {
                sink.set(Metric::ServiceUp, app, 1.0);
                sink.set(Metric::UpSince, app, *uptime_secs);
            }
            LivenessVerdict::Down { uptime_secs, .. } => {
                sink.set(Metric::ServiceUp, app, 0.0);
                sink.set(Metric::UpSince, app, *uptime_secs);
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LivenessVerdict::DeadlineExceeded => "deadline_exceeded",
            LivenessVerdict::TransportFailure { .. } => "transport_failure",
            LivenessVerdict::DecodeFailure { .. } => "decode_failure",
            LivenessVerdict::Up { .. } => "up",
            LivenessVerdict::Down { .. } => "down",
        }
    }
}

impl WorkloadVerdict {
    /// Flags cleared before every workload probe.
    pub fn reset<S: MetricSink + ?Sized>(sink: &S, app: &str) {
        sink.set(Metric::AppTimeout, app, 0.0);
        sink.set(Metric::AppUnreachable, app, 0.0);
    }

    pub fn record<S: MetricSink + ?Sized>(&self, sink: &S, app: &str) {
        match self {
            WorkloadVerdict::DeadlineExceeded => sink.set(Metric::AppTimeout, app, 1.0),
            WorkloadVerdict::TransportFailure => sink.set(Metric::AppUnreachable, app, 1.0),
            WorkloadVerdict::BadStatus { .. } => sink.increment(Metric::FailureCount, app, 1),
            WorkloadVerdict::Success { latency } => {
                sink.set(Metric::AppLatency, app, latency.as_micros() as f64)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkloadVerdict::DeadlineExceeded => "deadline_exceeded",
            WorkloadVerdict::TransportFailure => "transport_failure",
            WorkloadVerdict::BadStatus { .. } => "bad_status",
            WorkloadVerdict::Success { .. } => "success",
        }
    }
}
