//! service-monitor
//!
//! Periodically probes the configured services and serves the results as
//! Prometheus metrics.
//!
//! ```text
//!   ┌──────────── service-monitor ─────────────┐
//!   │                                          │        ┌───────────┐
//!   │  scheduler ──▶ probe ──────────────────────────▶   │ /health   │
//!   │      │           │                       │        │ /work     │ target
//!   │      │       classifier                  │        └───────────┘
//!   │      │           │                       │
//!   │      └──────▶ metric sink ──▶ /metrics ◀──────── Prometheus scrape
//!   └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use service_monitor::config::loader::load_config;
use service_monitor::lifecycle::startup;
use service_monitor::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "service-monitor")]
#[command(about = "Probe HTTP services and export their health as metrics", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "/etc/monitor/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        services = config.services.len(),
        interval_ms = config.monitor.interval_ms,
        timeout_ms = config.monitor.timeout_ms,
        "service-monitor starting"
    );

    startup::run(config).await?;
    Ok(())
}
