//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Checks (health/checks.rs):
//!     → MetricSink (metrics.rs trait)
//!         → PrometheusSink → metrics recorder → scrape endpoint
//!         → MemorySink (memory.rs) for tests and in-process reads
//!
//! Everything:
//!     → logging.rs (tracing subscriber, structured fields)
//! ```
//!
//! # Design Decisions
//! - The sink is injected, never global, so checks can be tested in memory
//! - Gauges hold the latest value; the only counter never decreases

pub mod logging;
pub mod memory;
pub mod metrics;

pub use self::memory::MemorySink;
pub use self::metrics::{Metric, MetricKind, MetricSink, PrometheusSink};
