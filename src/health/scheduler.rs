//! Check scheduling.
//!
//! # Responsibilities
//! - Fire a round every `interval`
//! - Run liveness then workload for each target, in registry order
//! - Skip (never queue) a tick while the previous round is still running
//!
//! # State Machine
//! ```text
//! Idle → tick → Checking(target_0, liveness) → Checking(target_0, workload)
//!      → … → Checking(target_n, workload) → Idle
//! Idle/Checking → shutdown → stopped (an in-flight round is aborted)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::health::checks::{check_liveness, check_workload};
use crate::health::probe::Probe;
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::observability::MetricSink;
use crate::registry::{MonitorPolicy, TargetRegistry};

/// Counters describing what the scheduler has done so far.
#[derive(Debug, Default)]
pub struct SchedulerStats {
    rounds_started: AtomicU64,
    rounds_completed: AtomicU64,
    overruns: AtomicU64,
}

impl SchedulerStats {
    pub fn rounds_started(&self) -> u64 {
        self.rounds_started.load(Ordering::Relaxed)
    }

    pub fn rounds_completed(&self) -> u64 {
        self.rounds_completed.load(Ordering::Relaxed)
    }

    /// Ticks skipped because a round was still in flight.
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }
}

/// Drives check rounds on a fixed cadence.
pub struct Scheduler<P, S> {
    registry: Arc<TargetRegistry>,
    policy: MonitorPolicy,
    probe: Arc<P>,
    sink: Arc<S>,
    stats: Arc<SchedulerStats>,
}

impl<P, S> Scheduler<P, S>
where
    P: Probe + 'static,
    S: MetricSink + 'static,
{
    pub fn new(registry: Arc<TargetRegistry>, policy: MonitorPolicy, probe: Arc<P>, sink: Arc<S>) -> Self {
        Self {
            registry,
            policy,
            probe,
            sink,
            stats: Arc::new(SchedulerStats::default()),
        }
    }

    /// Shared handle on the scheduler's counters.
    pub fn stats(&self) -> Arc<SchedulerStats> {
        self.stats.clone()
    }

    /// Run one full round inline.
    pub async fn run_once(&self) {
        run_round(
            self.registry.clone(),
            self.policy,
            self.probe.clone(),
            self.sink.clone(),
            self.stats.clone(),
        )
        .await;
    }

    /// Tick until shutdown. The first round starts immediately.
    pub async fn run(self, mut shutdown: ShutdownListener) {
        tracing::info!(
            targets = self.registry.len(),
            interval_ms = self.policy.interval.as_millis() as u64,
            timeout_ms = self.policy.timeout.as_millis() as u64,
            "Scheduler starting"
        );

        let mut ticker = time::interval(self.policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if in_flight.as_ref().is_some_and(|round| !round.is_finished()) {
                        self.stats.overruns.fetch_add(1, Ordering::Relaxed);
                        metrics::record_round_overrun();
                        tracing::warn!(
                            interval_ms = self.policy.interval.as_millis() as u64,
                            "Previous round still running, skipping tick"
                        );
                        continue;
                    }

                    in_flight = Some(tokio::spawn(run_round(
                        self.registry.clone(),
                        self.policy,
                        self.probe.clone(),
                        self.sink.clone(),
                        self.stats.clone(),
                    )));
                }
                _ = shutdown.wait() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        if let Some(round) = in_flight.take() {
            round.abort();
        }
    }
}

async fn run_round<P, S>(
    registry: Arc<TargetRegistry>,
    policy: MonitorPolicy,
    probe: Arc<P>,
    sink: Arc<S>,
    stats: Arc<SchedulerStats>,
) where
    P: Probe,
    S: MetricSink,
{
    let round = stats.rounds_started.fetch_add(1, Ordering::Relaxed) + 1;
    let start = Instant::now();

    for target in registry.iter() {
        let liveness = check_liveness(target, probe.as_ref(), sink.as_ref(), &policy).await;
        let workload = check_workload(target, probe.as_ref(), sink.as_ref(), &policy).await;
        tracing::debug!(
            round,
            app = target.name(),
            liveness = liveness.label(),
            workload = workload.label(),
            "Target checked"
        );
    }

    let elapsed = start.elapsed();
    metrics::record_round_duration(elapsed);
    stats.rounds_completed.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(round, elapsed_ms = elapsed.as_millis() as u64, "Round complete");
}
