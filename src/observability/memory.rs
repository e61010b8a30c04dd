//! In-process metric store.

use std::sync::Arc;

use dashmap::DashMap;

use crate::observability::metrics::{Metric, MetricKind, MetricSink};

/// One stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: Metric,
    pub service: String,
    pub value: f64,
}

/// A concurrent map from `(metric, service)` to the last written value.
///
/// Clones share the same storage. Each key is updated atomically, so
/// readers never observe a torn counter increment.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<DashMap<(Metric, String), f64>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric, service: &str) -> Option<f64> {
        self.inner
            .get(&(metric, service.to_string()))
            .map(|r| *r.value())
    }

    /// All values, ordered by service then metric.
    pub fn snapshot(&self) -> Vec<Sample> {
        let mut samples: Vec<Sample> = self
            .inner
            .iter()
            .map(|r| Sample {
                metric: r.key().0,
                service: r.key().1.clone(),
                value: *r.value(),
            })
            .collect();
        samples.sort_by(|a, b| a.service.cmp(&b.service).then(a.metric.cmp(&b.metric)));
        samples
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl MetricSink for MemorySink {
    fn set(&self, metric: Metric, service: &str, value: f64) {
        if metric.kind() == MetricKind::Counter {
            tracing::error!(metric = %metric, app = %service, "Refusing to set a counter");
            return;
        }
        self.inner.insert((metric, service.to_string()), value);
    }

    fn increment(&self, metric: Metric, service: &str, delta: u64) {
        *self
            .inner
            .entry((metric, service.to_string()))
            .or_insert(0.0) += delta as f64;
    }
}
