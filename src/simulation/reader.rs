//! Reader lifecycle
//!
//! One reader is one concurrently-executing task walking its circuit:
//! start at library `id % M`, then repeat checkout → hold → checkin →
//! advance to `(library + 1) % M`, up to the cycle target. A checkout that
//! finds every copy out ends the reader immediately: no retry, no backoff,
//! no trying other libraries. Abandonment is a normal terminal outcome.
//!
//! The simulated reading sleep is the reader's only suspension point and
//! happens strictly outside every library lock.

use crate::recording::event::TraceEventKind;
use crate::recording::trace_writer::TraceHandle;
use crate::simulation::hold::HoldPolicy;
use crate::simulation::registry::LibraryRegistry;
use metrics::{counter, histogram};
use std::sync::Arc;
use tracing::{debug, info};

/// Terminal state of a reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderOutcome {
    /// Finished the full cycle target
    Completed { cycles: usize },

    /// Found no available book on arrival and gave up
    Abandoned { library: usize, cycles: usize },
}

/// A single reader bound to the shared registry
pub struct Reader {
    /// Reader id (0..N-1); also fixes the starting library
    id: usize,

    /// Successful cycles required to complete
    target_cycles: usize,

    registry: Arc<LibraryRegistry>,
    hold: Arc<dyn HoldPolicy>,
    trace: TraceHandle,
}

impl Reader {
    /// Create a reader
    pub fn new(
        id: usize,
        target_cycles: usize,
        registry: Arc<LibraryRegistry>,
        hold: Arc<dyn HoldPolicy>,
        trace: TraceHandle,
    ) -> Self {
        Self {
            id,
            target_cycles,
            registry,
            hold,
            trace,
        }
    }

    /// Reader id
    pub fn id(&self) -> usize {
        self.id
    }

    /// Drive the reader to a terminal state
    pub async fn run(self) -> ReaderOutcome {
        let libraries = self.registry.library_count();
        let mut library = self.id % libraries;

        self.trace
            .emit(self.id, TraceEventKind::ReaderStarted { library });
        debug!(reader = self.id, library, "reader starting");

        for cycle in 0..self.target_cycles {
            self.trace
                .emit(self.id, TraceEventKind::CheckoutRequested { library });

            let Some(book) = self.registry.checkout(library, self.id) else {
                info!(reader = self.id, library, "no book available, abandoning");
                self.trace
                    .emit(self.id, TraceEventKind::Abandoned { library });
                counter!("biblioteca_readers_abandoned_total").increment(1);

                return ReaderOutcome::Abandoned {
                    library,
                    cycles: cycle,
                };
            };

            self.trace
                .emit(self.id, TraceEventKind::BookCheckedOut { library, book });
            info!(reader = self.id, library, book, "book checked out");

            // Simulated reading; no lock is held across this await.
            let hold = self.hold.hold_duration(self.id);
            histogram!("biblioteca_hold_seconds").record(hold.as_secs_f64());
            tokio::time::sleep(hold).await;

            self.registry.checkin(library, book, self.id);
            self.trace
                .emit(self.id, TraceEventKind::BookReturned { library, book });

            library = (library + 1) % libraries;
            self.trace
                .emit(self.id, TraceEventKind::MovedToLibrary { library });
            debug!(reader = self.id, library, cycle, "moving on");
        }

        self.trace.emit(
            self.id,
            TraceEventKind::Completed {
                cycles: self.target_cycles,
            },
        );
        counter!("biblioteca_readers_completed_total").increment(1);
        info!(reader = self.id, cycles = self.target_cycles, "reader done");

        ReaderOutcome::Completed {
            cycles: self.target_cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::trace_writer::TraceRecorder;
    use crate::simulation::hold::FixedHold;
    use crate::utils::config::TraceSettings;
    use std::time::Duration;
    use tempfile::tempdir;

    async fn test_trace(dir: &tempfile::TempDir) -> TraceRecorder {
        let settings = TraceSettings {
            path: dir.path().join("trace.jsonl"),
            queue_capacity: 1024,
            flush_interval_ms: 5,
        };
        TraceRecorder::new(settings, "01HTESTRUN").await.unwrap()
    }

    #[tokio::test]
    async fn test_lone_reader_completes_and_restores_shelves() {
        let dir = tempdir().unwrap();
        let recorder = test_trace(&dir).await;
        let registry = Arc::new(LibraryRegistry::new(3, 2));

        let reader = Reader::new(
            0,
            2,
            Arc::clone(&registry),
            Arc::new(FixedHold(Duration::ZERO)),
            recorder.handle(),
        );

        let outcome = reader.run().await;
        assert_eq!(outcome, ReaderOutcome::Completed { cycles: 2 });

        // Every copy it took came back.
        for library in 0..3 {
            assert_eq!(registry.checked_out_count(library), 0);
        }
        let stats = registry.stats();
        assert_eq!(stats.checkouts, 2);
        assert_eq!(stats.checkins, 2);
    }

    #[tokio::test]
    async fn test_reader_starts_at_id_mod_m() {
        let dir = tempdir().unwrap();
        let recorder = test_trace(&dir).await;
        let registry = Arc::new(LibraryRegistry::new(3, 1));

        // Reader 4 of a 3-library circuit starts at library 1. One cycle
        // only, so only library 1 sees a checkout.
        let reader = Reader::new(
            4,
            1,
            Arc::clone(&registry),
            Arc::new(FixedHold(Duration::ZERO)),
            recorder.handle(),
        );

        let outcome = reader.run().await;
        assert_eq!(outcome, ReaderOutcome::Completed { cycles: 1 });

        let stats = registry.stats();
        assert_eq!(stats.checkouts, 1);
        assert_eq!(stats.refusals, 0);
    }

    #[tokio::test]
    async fn test_empty_library_means_immediate_abandonment() {
        let dir = tempdir().unwrap();
        let recorder = test_trace(&dir).await;
        let registry = Arc::new(LibraryRegistry::new(2, 1));

        // Drain library 0 before the reader arrives.
        registry.checkout(0, 99).unwrap();

        let reader = Reader::new(
            0,
            3,
            Arc::clone(&registry),
            Arc::new(FixedHold(Duration::ZERO)),
            recorder.handle(),
        );

        let outcome = reader.run().await;
        assert_eq!(
            outcome,
            ReaderOutcome::Abandoned {
                library: 0,
                cycles: 0
            }
        );

        // It never went on to library 1.
        assert_eq!(registry.checked_out_count(1), 0);
        assert_eq!(registry.stats().refusals, 1);
    }

    #[tokio::test]
    async fn test_abandonment_mid_circuit_keeps_completed_cycles() {
        let dir = tempdir().unwrap();
        let recorder = test_trace(&dir).await;
        let registry = Arc::new(LibraryRegistry::new(2, 1));

        // Library 1 is drained, so the reader completes one cycle at
        // library 0 and abandons on arrival at library 1.
        registry.checkout(1, 99).unwrap();

        let reader = Reader::new(
            0,
            2,
            Arc::clone(&registry),
            Arc::new(FixedHold(Duration::ZERO)),
            recorder.handle(),
        );

        let outcome = reader.run().await;
        assert_eq!(
            outcome,
            ReaderOutcome::Abandoned {
                library: 1,
                cycles: 1
            }
        );
        assert_eq!(registry.checked_out_count(0), 0);
    }
}
