//! Liveness and workload checks for one target.
//!
//! Each check resets its own flags, probes once, classifies the outcome and
//! records it. Neither check fails: every condition ends up in the sink or
//! the log.

use crate::health::classifier::{classify_liveness, classify_workload, LivenessVerdict, WorkloadVerdict};
use crate::health::probe::Probe;
use crate::observability::MetricSink;
use crate::registry::{MonitorPolicy, Target};

/// Probe `/health` and record the liveness condition.
pub async fn check_liveness<P, S>(target: &Target, probe: &P, sink: &S, policy: &MonitorPolicy) -> LivenessVerdict
where
    P: Probe,
    S: MetricSink + ?Sized,
{
    let app = target.name();
    LivenessVerdict::reset(sink, app, policy.decode_failure);

    let url = target.health_url();
    let outcome = probe.probe(&url, policy.timeout).await;
    let elapsed_ms = outcome.elapsed().as_millis() as u64;
    let verdict = classify_liveness(&outcome);

    match &verdict {
        LivenessVerdict::DeadlineExceeded => {
            tracing::warn!(app, url = %url, elapsed_ms, "Health check failed: timeout");
        }
        LivenessVerdict::TransportFailure { reason } => {
            tracing::warn!(app, url = %url, error = %reason, "Health check failed: connection error");
        }
        LivenessVerdict::DecodeFailure { reason } => {
            tracing::warn!(
                app,
                url = %url,
                error = %reason,
                policy = ?policy.decode_failure,
                "Health check payload could not be decoded"
            );
        }
        LivenessVerdict::Up { uptime_secs } => {
            tracing::debug!(app, elapsed_ms, uptime_secs, "Service is up");
        }
        LivenessVerdict::Down { status, uptime_secs } => {
            tracing::warn!(app, status = %status, uptime_secs, "Service reports not up");
        }
    }

    verdict.record(sink, app, policy.decode_failure);
    verdict
}

/// Probe `/work` and record the workload condition.
pub async fn check_workload<P, S>(target: &Target, probe: &P, sink: &S, policy: &MonitorPolicy) -> WorkloadVerdict
where
    P: Probe,
    S: MetricSink + ?Sized,
{
    let app = target.name();
    WorkloadVerdict::reset(sink, app);

    let url = target.work_url();
    let outcome = probe.probe(&url, policy.timeout).await;
    let elapsed_ms = outcome.elapsed().as_millis() as u64;
    let verdict = classify_workload(&outcome);

    match verdict {
        WorkloadVerdict::DeadlineExceeded => {
            tracing::warn!(app, url = %url, elapsed_ms, "Work call failed: timeout");
        }
        WorkloadVerdict::TransportFailure => {
            tracing::warn!(app, url = %url, elapsed_ms, "Work call failed: app unreachable");
        }
        WorkloadVerdict::BadStatus { status } => {
            tracing::warn!(app, url = %url, status, "Work call failed: non-success status");
        }
        WorkloadVerdict::Success { latency } => {
            tracing::debug!(app, latency_us = latency.as_micros() as u64, "Work call succeeded");
        }
    }

    verdict.record(sink, app);
    verdict
}
