//! HTTP service monitor.
//!
//! Probes a fixed fleet of services on a fixed cadence, classifies every
//! probe into a small set of health conditions and exposes the result as
//! per-service Prometheus metrics.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use config::MonitorConfig;
pub use health::Scheduler;
pub use lifecycle::Shutdown;
