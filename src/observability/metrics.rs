//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Name every per-service metric the checks write
//! - Define the [`MetricSink`] seam the checks write through
//! - Expose a Prometheus-compatible scrape endpoint
//!
//! # Metrics
//! Per service, labelled `app=<name>`:
//! - `service_up`, `health_timeout`, `health_failure`, `health_decode_failure`,
//!   `app_unreachable`, `app_timeout` (gauges, 0 or 1)
//! - `up_since` (gauge): self-reported uptime in seconds
//! - `app_latency` (gauge): last successful workload latency in microseconds
//! - `failure_count` (counter): workload responses outside 2xx
//!
//! Scheduler self-metrics:
//! - `monitor_round_duration_seconds` (histogram)
//! - `monitor_round_overruns` (counter): ticks skipped because a round was running

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::registry::TargetRegistry;

/// Label carrying the service name.
pub const SERVICE_LABEL: &str = "app";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Every per-service metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    ServiceUp,
    HealthTimeout,
    HealthFailure,
    HealthDecodeFailure,
    UpSince,
    AppUnreachable,
    AppTimeout,
    AppLatency,
    FailureCount,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::ServiceUp,
        Metric::HealthTimeout,
        Metric::HealthFailure,
        Metric::HealthDecodeFailure,
        Metric::UpSince,
        Metric::AppUnreachable,
        Metric::AppTimeout,
        Metric::AppLatency,
        Metric::FailureCount,
    ];

    /// Exposed metric name.
    pub fn name(self) -> &'static str {
        match self {
            Metric::ServiceUp => "service_up",
            Metric::HealthTimeout => "health_timeout",
            Metric::HealthFailure => "health_failure",
            Metric::HealthDecodeFailure => "health_decode_failure",
            Metric::UpSince => "up_since",
            Metric::AppUnreachable => "app_unreachable",
            Metric::AppTimeout => "app_timeout",
            Metric::AppLatency => "app_latency",
            Metric::FailureCount => "failure_count",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Metric::ServiceUp => "Service up status",
            Metric::HealthTimeout => "Health check timed out",
            Metric::HealthFailure => "Health check could not reach the service",
            Metric::HealthDecodeFailure => "Health check payload could not be decoded",
            Metric::UpSince => "Service self-reported uptime in seconds",
            Metric::AppUnreachable => "Monitor could not contact the app",
            Metric::AppTimeout => "Application call timed out",
            Metric::AppLatency => "Latency of the last successful application call in microseconds",
            Metric::FailureCount => "Application calls returning non 2xx",
        }
    }

    pub fn kind(self) -> MetricKind {
        match self {
            Metric::FailureCount => MetricKind::Counter,
            _ => MetricKind::Gauge,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destination for per-service check results.
///
/// Implementations must tolerate concurrent writers and readers; the
/// checks hold no lock above the sink.
pub trait MetricSink: Send + Sync {
    /// Overwrite a gauge. Counters must not be set.
    fn set(&self, metric: Metric, service: &str, value: f64);

    /// Add to a counter.
    fn increment(&self, metric: Metric, service: &str, delta: u64);
}

/// Zero every metric for every target so that all series exist before the
/// first round completes.
///
/// `health_decode_failure` is only primed when `with_decode_flag` is set.
pub fn prime<S: MetricSink + ?Sized>(sink: &S, registry: &TargetRegistry, with_decode_flag: bool) {
    for target in registry {
        for metric in Metric::ALL {
            match metric.kind() {
                MetricKind::Counter => sink.increment(metric, target.name(), 0),
                MetricKind::Gauge if metric == Metric::HealthDecodeFailure && !with_decode_flag => {}
                MetricKind::Gauge => sink.set(metric, target.name(), 0.0),
            }
        }
    }
}

/// Sink writing through the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusSink;

impl MetricSink for PrometheusSink {
    fn set(&self, metric: Metric, service: &str, value: f64) {
        if metric.kind() == MetricKind::Counter {
            tracing::error!(metric = %metric, app = %service, "Refusing to set a counter");
            return;
        }
        gauge!(metric.name(), SERVICE_LABEL => service.to_owned()).set(value);
    }

    fn increment(&self, metric: Metric, service: &str, delta: u64) {
        counter!(metric.name(), SERVICE_LABEL => service.to_owned()).increment(delta);
    }
}

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    for metric in Metric::ALL {
        match metric.kind() {
            MetricKind::Gauge => describe_gauge!(metric.name(), metric.help()),
            MetricKind::Counter => describe_counter!(metric.name(), metric.help()),
        }
    }
    describe_histogram!(
        "monitor_round_duration_seconds",
        metrics::Unit::Seconds,
        "Wall-clock duration of a full check round"
    );
    describe_counter!(
        "monitor_round_overruns",
        "Ticks skipped because the previous round was still running"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_round_duration(elapsed: Duration) {
    histogram!("monitor_round_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_round_overrun() {
    counter!("monitor_round_overruns").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    use crate::observability::memory::MemorySink;
    use crate::registry::Target;

    #[test]
    fn test_metric_names_are_unique() {
        let mut names: Vec<_> = Metric::ALL.iter().map(|m| m.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Metric::ALL.len());
    }

    #[test]
    fn test_only_failure_count_is_a_counter() {
        let counters: Vec<_> = Metric::ALL
            .into_iter()
            .filter(|m| m.kind() == MetricKind::Counter)
            .collect();
        assert_eq!(counters, vec![Metric::FailureCount]);
    }

    #[test]
    fn test_prime_zeroes_every_series() {
        let registry = TargetRegistry::new(vec![
            Target::new("orders", "http://a:1"),
            Target::new("billing", "http://b:1"),
        ]);
        let sink = MemorySink::new();
        prime(&sink, &registry, false);

        for app in ["orders", "billing"] {
            assert_eq!(sink.get(Metric::ServiceUp, app), Some(0.0));
            assert_eq!(sink.get(Metric::AppLatency, app), Some(0.0));
            assert_eq!(sink.get(Metric::FailureCount, app), Some(0.0));
            assert_eq!(sink.get(Metric::HealthDecodeFailure, app), None);
        }
        assert_eq!(sink.len(), 16);

        prime(&sink, &registry, true);
        assert_eq!(sink.get(Metric::HealthDecodeFailure, "orders"), Some(0.0));
    }

    fn recorded(
        entries: &[(metrics_util::CompositeKey, Option<metrics::Unit>, Option<metrics::SharedString>, DebugValue)],
        name: &str,
        app: &str,
    ) -> Option<(metrics_util::MetricKind, DebugValue)> {
        entries.iter().find_map(|(key, _, _, value)| {
            let labelled = key
                .key()
                .labels()
                .any(|label| label.key() == SERVICE_LABEL && label.value() == app);
            (key.key().name() == name && labelled).then(|| {
                // DebugValue is not Clone; rebuild an owned copy.
                let owned = match value {
                    DebugValue::Counter(c) => DebugValue::Counter(*c),
                    DebugValue::Gauge(g) => DebugValue::Gauge(*g),
                    DebugValue::Histogram(h) => DebugValue::Histogram(h.clone()),
                };
                (key.kind(), owned)
            })
        })
    }

    #[test]
    fn test_prometheus_sink_writes_labelled_series() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let sink = PrometheusSink;
            sink.set(Metric::ServiceUp, "orders", 1.0);
            sink.set(Metric::AppLatency, "orders", 7000.0);
            sink.increment(Metric::FailureCount, "orders", 2);
            // Refused: counters only move through increment.
            sink.set(Metric::FailureCount, "orders", 99.0);
        });

        let entries = snapshotter.snapshot().into_vec();

        let (kind, value) = recorded(&entries, "service_up", "orders").expect("service_up missing");
        assert_eq!(kind, metrics_util::MetricKind::Gauge);
        assert!(matches!(value, DebugValue::Gauge(v) if v.into_inner() == 1.0));

        let (_, value) = recorded(&entries, "app_latency", "orders").expect("app_latency missing");
        assert!(matches!(value, DebugValue::Gauge(v) if v.into_inner() == 7000.0));

        let (kind, value) = recorded(&entries, "failure_count", "orders").expect("failure_count missing");
        assert_eq!(kind, metrics_util::MetricKind::Counter);
        assert_eq!(value, DebugValue::Counter(2));

        assert!(recorded(&entries, "service_up", "billing").is_none());
        assert!(!entries
            .iter()
            .any(|(key, ..)| key.key().name() == "failure_count" && key.kind() == metrics_util::MetricKind::Gauge));
    }
}
