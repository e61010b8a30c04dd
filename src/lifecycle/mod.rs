//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Metrics exporter → Registry + policy → Prime sink → Spawn scheduler
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop flag set → scheduler loop exits → in-flight round aborted
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing is persisted across restarts

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownListener};
