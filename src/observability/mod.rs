//! Metrics, tracing, and logging
//!
//! Diagnostic logging goes through `tracing`; the trace-event pipeline in
//! [`crate::recording`] is separate and carries the simulation's own event
//! stream. Metric names registered here are emitted by the simulation core;
//! no exporter is bundled, so an embedder installs whatever recorder fits
//! its deployment.

use crate::utils::errors::{EngineError, Result};
use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Initialize the global tracing subscriber
///
/// Level selection follows `RUST_LOG`, defaulting to `info`. Idempotent so
/// tests and embedders may call it more than once.
pub fn init_tracing() -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|e| EngineError::ObservabilityInit(e.to_string()))
    })?;

    Ok(())
}

/// Register metric descriptions for the simulation counters
pub fn init_metrics() -> Result<()> {
    describe_counter!(
        "biblioteca_checkouts_total",
        "Successful book checkouts across all libraries"
    );
    describe_counter!(
        "biblioteca_checkins_total",
        "Book checkins across all libraries"
    );
    describe_counter!(
        "biblioteca_refusals_total",
        "Checkout attempts that found no available book"
    );
    describe_counter!(
        "biblioteca_readers_completed_total",
        "Readers that finished their full cycle target"
    );
    describe_counter!(
        "biblioteca_readers_abandoned_total",
        "Readers that gave up after an empty library"
    );
    describe_histogram!(
        "biblioteca_hold_seconds",
        "Simulated reading time per successful checkout"
    );

    Ok(())
}
