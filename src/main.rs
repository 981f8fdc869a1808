//! Biblioteca Simulation Engine
//!
//! Runs one reader/library contention simulation: N concurrent readers
//! circling M libraries of K book copies each, with a JSONL trace of every
//! checkout, checkin, abandonment, and completion.

use anyhow::Result;
use biblioteca_engine::observability::{init_metrics, init_tracing};
use biblioteca_engine::simulation::Orchestrator;
use biblioteca_engine::utils::config::EngineConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize observability (tracing, metrics)
    init_tracing()?;
    init_metrics()?;

    info!(
        "Starting Biblioteca Simulation Engine v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration (defaults, optional biblioteca.toml, environment)
    let config = EngineConfig::load()?;
    info!("Configuration loaded: {:?}", config);

    let orchestrator = Orchestrator::new(config)?;

    // Best-effort shutdown on operator interrupt
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    let report = orchestrator.run_with_shutdown(shutdown_signal).await?;

    info!(
        completed = report.completed,
        abandoned = report.abandoned,
        faulted = report.faulted,
        interrupted = report.interrupted,
        trace_events = report.trace.events_written,
        "run complete"
    );

    Ok(())
}
