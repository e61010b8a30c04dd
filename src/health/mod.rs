//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler.rs: periodic timer
//!     → for each target, in registry order:
//!         checks.rs: liveness (/health), then workload (/work)
//!             → probe.rs (one bounded GET)
//!             → classifier.rs (outcome → exactly one verdict)
//!             → MetricSink
//! ```
//!
//! # Design Decisions
//! - Probe failures are data, never errors; a round always completes
//! - Every check resets its own flags before probing
//! - Rounds never overlap: a tick during a running round is skipped

pub mod checks;
pub mod classifier;
pub mod probe;
pub mod scheduler;

pub use checks::{check_liveness, check_workload};
pub use classifier::{LivenessReport, LivenessVerdict, WorkloadVerdict};
pub use probe::{HttpProbe, Probe, ProbeOutcome};
pub use scheduler::{Scheduler, SchedulerStats};
