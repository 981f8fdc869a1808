//! Simulation orchestrator
//!
//! Builds the shared registry, the trace pipeline, and N readers; starts
//! all readers concurrently and waits until every one reaches a terminal
//! state. Shutdown is best-effort: when the caller's shutdown future fires,
//! in-flight readers are aborted and the run is reported as interrupted.
//! A book held across the abort stays checked out.

use crate::recording::trace_writer::{TraceRecorder, WriterStats};
use crate::simulation::hold::{HoldPolicy, UniformHold};
use crate::simulation::reader::{Reader, ReaderOutcome};
use crate::simulation::registry::{LibraryRegistry, RegistryStats};
use crate::utils::config::EngineConfig;
use crate::utils::errors::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use ulid::Ulid;

/// Orchestrates one simulation run
pub struct Orchestrator {
    config: EngineConfig,
    registry: Arc<LibraryRegistry>,
    hold: Arc<dyn HoldPolicy>,
}

impl Orchestrator {
    /// Create an orchestrator from validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let hold = Arc::new(UniformHold::from_settings(&config.hold));
        Ok(Self::with_hold_policy(config, hold))
    }

    /// Create with an injected hold policy (deterministic tests)
    ///
    /// The caller is responsible for passing validated configuration.
    pub fn with_hold_policy(config: EngineConfig, hold: Arc<dyn HoldPolicy>) -> Self {
        let registry = Arc::new(LibraryRegistry::new(
            config.simulation.libraries,
            config.simulation.books_per_library,
        ));

        Self {
            config,
            registry,
            hold,
        }
    }

    /// The shared registry (observation hook for tests and embedders)
    pub fn registry(&self) -> Arc<LibraryRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run to completion
    pub async fn run(self) -> Result<SimulationReport> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run until every reader terminates or `shutdown` fires
    pub async fn run_with_shutdown(
        self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<SimulationReport> {
        let run_id = Ulid::new().to_string();
        let readers = self.config.simulation.readers;
        let target_cycles = self.config.simulation.books_per_library;

        let mut recorder = TraceRecorder::new(self.config.trace.clone(), &run_id).await?;
        recorder.start();
        let trace = recorder.handle();

        info!(
            run_id,
            readers,
            libraries = self.config.simulation.libraries,
            books_per_library = target_cycles,
            "simulation starting"
        );

        let started = Instant::now();
        let mut tasks = JoinSet::new();
        for id in 0..readers {
            let reader = Reader::new(
                id,
                target_cycles,
                Arc::clone(&self.registry),
                Arc::clone(&self.hold),
                trace.clone(),
            );
            tasks.spawn(async move { (id, reader.run().await) });
        }

        let mut outcomes: Vec<(usize, ReaderOutcome)> = Vec::with_capacity(readers);
        let mut faulted = 0usize;
        let mut interrupted = false;

        tokio::pin!(shutdown);
        loop {
            let joined = tokio::select! {
                joined = tasks.join_next() => joined,
                _ = &mut shutdown, if !interrupted => {
                    warn!("shutdown requested, aborting in-flight readers");
                    interrupted = true;
                    tasks.abort_all();
                    continue;
                }
            };

            match joined {
                None => break,
                Some(Ok((id, outcome))) => outcomes.push((id, outcome)),
                Some(Err(e)) if e.is_panic() => {
                    // A reader only panics on a pool contract violation;
                    // the fault stays confined to that reader.
                    error!("reader task panicked: {}", e);
                    faulted += 1;
                }
                Some(Err(_)) => {
                    // Aborted during shutdown; accounted for by `interrupted`.
                }
            }
        }

        let trace_stats = recorder.shutdown().await?;
        outcomes.sort_by_key(|(id, _)| *id);

        let report = SimulationReport {
            run_id,
            completed: outcomes
                .iter()
                .filter(|(_, o)| matches!(o, ReaderOutcome::Completed { .. }))
                .count(),
            abandoned: outcomes
                .iter()
                .filter(|(_, o)| matches!(o, ReaderOutcome::Abandoned { .. }))
                .count(),
            faulted,
            interrupted,
            outcomes,
            elapsed: started.elapsed(),
            registry: self.registry.stats(),
            trace: trace_stats,
        };

        info!(
            run_id = report.run_id,
            completed = report.completed,
            abandoned = report.abandoned,
            faulted = report.faulted,
            interrupted = report.interrupted,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "simulation finished"
        );

        Ok(report)
    }
}

/// Final accounting for one simulation run
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Run ID stamped on every trace event
    pub run_id: String,

    /// Terminal outcome per reader, ordered by reader id
    pub outcomes: Vec<(usize, ReaderOutcome)>,

    /// Readers that finished the full cycle target
    pub completed: usize,

    /// Readers that gave up at an empty library
    pub abandoned: usize,

    /// Readers lost to a panic (contract violation)
    pub faulted: usize,

    /// Whether the run was cut short by a shutdown request
    pub interrupted: bool,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Registry counters at the end of the run
    pub registry: RegistryStats,

    /// Trace writer statistics
    pub trace: WriterStats,
}

impl SimulationReport {
    /// Outcome of one reader, if it reached a terminal state
    pub fn outcome_of(&self, reader: usize) -> Option<&ReaderOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == reader)
            .map(|(_, outcome)| outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::hold::FixedHold;
    use crate::utils::config::{EngineConfig, SimulationSettings};
    use tempfile::tempdir;

    fn test_config(dir: &tempfile::TempDir, readers: usize, m: usize, k: usize) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.simulation = SimulationSettings {
            readers,
            libraries: m,
            books_per_library: k,
        };
        config.trace.path = dir.path().join("trace.jsonl");
        config.trace.flush_interval_ms = 5;
        config
    }

    #[tokio::test]
    async fn test_all_readers_reach_terminal_state() {
        let dir = tempdir().unwrap();
        let orchestrator = Orchestrator::with_hold_policy(
            test_config(&dir, 4, 2, 2),
            Arc::new(FixedHold(Duration::from_millis(1))),
        );

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.completed + report.abandoned, 4);
        assert_eq!(report.faulted, 0);
        assert!(!report.interrupted);
        assert_eq!(report.outcomes.len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let dir = tempdir().unwrap();
        let config = test_config(&dir, 0, 2, 2);
        assert!(Orchestrator::new(config).is_err());
    }

    #[tokio::test]
    async fn test_shutdown_cuts_the_run_short() {
        let dir = tempdir().unwrap();
        // Holds far longer than the shutdown delay: without the shutdown
        // the run would take ~10s.
        let orchestrator = Orchestrator::with_hold_policy(
            test_config(&dir, 3, 3, 2),
            Arc::new(FixedHold(Duration::from_secs(5))),
        );

        let started = Instant::now();
        let report = orchestrator
            .run_with_shutdown(tokio::time::sleep(Duration::from_millis(50)))
            .await
            .unwrap();

        assert!(report.interrupted);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_report_outcome_lookup() {
        let dir = tempdir().unwrap();
        let orchestrator = Orchestrator::with_hold_policy(
            test_config(&dir, 1, 2, 1),
            Arc::new(FixedHold(Duration::ZERO)),
        );

        let report = orchestrator.run().await.unwrap();
        assert!(matches!(
            report.outcome_of(0),
            Some(ReaderOutcome::Completed { cycles: 1 })
        ));
        assert!(report.outcome_of(1).is_none());
    }
}
