//! Startup orchestration.
//!
//! # Order
//! Logging is already installed by the caller, so config warnings land here.
//! 1. Metrics exporter (fatal if it cannot bind)
//! 2. Registry and policy from the validated config
//! 3. Prime every series to zero
//! 4. Spawn the scheduler, then wait for a stop signal

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{DecodeFailurePolicy, MonitorConfig};
use crate::health::{HttpProbe, Scheduler};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics::{self, prime};
use crate::observability::PrometheusSink;
use crate::registry::{MonitorPolicy, TargetRegistry};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address '{address}': {source}")]
    MetricsAddress {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("scheduler task failed: {0}")]
    Scheduler(#[from] tokio::task::JoinError),
}

/// Run the monitor until SIGINT/SIGTERM.
pub async fn run(config: MonitorConfig) -> Result<(), StartupError> {
    if config.monitor.may_overrun() {
        tracing::warn!(
            interval_ms = config.monitor.interval_ms,
            timeout_ms = config.monitor.timeout_ms,
            "Timeout is not shorter than the interval; slow rounds will skip ticks"
        );
    }

    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        let addr: SocketAddr = address.parse().map_err(|source| StartupError::MetricsAddress {
            address: address.clone(),
            source,
        })?;
        metrics::init_metrics(addr)?;
    } else {
        tracing::info!("Metrics endpoint disabled");
    }

    let registry = Arc::new(TargetRegistry::from_config(&config));
    let policy = MonitorPolicy::from(&config.monitor);
    let sink = Arc::new(PrometheusSink);
    prime(sink.as_ref(), &registry, policy.decode_failure == DecodeFailurePolicy::Flag);

    for target in registry.iter() {
        tracing::info!(app = target.name(), url = target.base_url(), "Monitoring target");
    }

    let probe = Arc::new(HttpProbe::new(policy.max_body_bytes));
    let scheduler = Scheduler::new(registry, policy, probe, sink);

    let shutdown = Shutdown::new();
    let task = tokio::spawn(scheduler.run(shutdown.listener()));

    signals::wait_for_shutdown().await;
    shutdown.trigger();
    task.await?;

    tracing::info!("Monitor stopped");
    Ok(())
}
