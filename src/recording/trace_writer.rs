//! Background trace writer
//!
//! Owns the event queue and a background task that drains it into a JSONL
//! trace file, one event per line. Readers emit through a cheap clonable
//! [`TraceHandle`]; emission is a lock-free queue push and never waits on
//! file I/O.
//!
//! # Architecture
//!
//! ```text
//! Reader → TraceHandle::emit() → Lock-Free Queue → Background Writer
//!               (stamp seq,                             ↓
//!               run id, time)                    drain on tick/notify
//!                                                       ↓
//!                                                 JSONL trace file
//! ```

use crate::recording::event::{TraceEvent, TraceEventKind};
use crate::recording::event_queue::EventQueue;
use crate::utils::config::TraceSettings;
use crate::utils::errors::{EngineError, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

/// Emission side of the trace pipeline
///
/// Cloned into every reader. Stamps the run id, a monotonic sequence number,
/// and the wall-clock timestamp at emission time.
#[derive(Clone)]
pub struct TraceHandle {
    queue: Arc<EventQueue>,
    seq: Arc<AtomicU64>,
    run_id: Arc<str>,
}

impl TraceHandle {
    /// Emit one event (non-blocking)
    ///
    /// A full queue drops the event; the loss shows up in [`WriterStats`].
    pub fn emit(&self, reader: usize, kind: TraceEventKind) {
        let event = TraceEvent {
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
            run_id: self.run_id.to_string(),
            reader,
            timestamp: Utc::now(),
            kind,
        };

        if self.queue.push(event).is_err() {
            debug!(reader, "trace queue full, event dropped");
        }
    }

    /// Run ID this handle stamps on events
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

/// Trace recorder owning the queue and the background writer task
pub struct TraceRecorder {
    settings: TraceSettings,
    queue: Arc<EventQueue>,
    seq: Arc<AtomicU64>,
    run_id: Arc<str>,
    flush_notify: Arc<Notify>,
    shutdown: Arc<AtomicBool>,
    file: Option<File>,
    writer_handle: Option<JoinHandle<WriterStats>>,
}

impl TraceRecorder {
    /// Create a recorder and truncate the trace file for this run
    pub async fn new(settings: TraceSettings, run_id: &str) -> Result<Self> {
        let file = File::create(&settings.path).await?;
        info!(path = %settings.path.display(), run_id, "trace file opened");

        Ok(Self {
            queue: Arc::new(EventQueue::new(settings.queue_capacity)),
            seq: Arc::new(AtomicU64::new(0)),
            run_id: Arc::from(run_id),
            flush_notify: Arc::new(Notify::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
            file: Some(file),
            writer_handle: None,
            settings,
        })
    }

    /// Start the background writer
    pub fn start(&mut self) {
        let file = match self.file.take() {
            Some(file) => file,
            None => return, // already started
        };

        let queue = Arc::clone(&self.queue);
        let flush_notify = Arc::clone(&self.flush_notify);
        let shutdown = Arc::clone(&self.shutdown);
        let flush_interval = Duration::from_millis(self.settings.flush_interval_ms.max(1));

        let handle = tokio::spawn(async move {
            let mut writer = BufWriter::new(file);
            let mut interval = tokio::time::interval(flush_interval);
            let mut stats = WriterStats::default();

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = flush_notify.notified() => {}
                }

                while let Some(event) = queue.try_pop() {
                    match serde_json::to_string(&event) {
                        Ok(line) => {
                            let write = async {
                                writer.write_all(line.as_bytes()).await?;
                                writer.write_all(b"\n").await
                            };
                            match write.await {
                                Ok(()) => stats.events_written += 1,
                                Err(e) => {
                                    stats.write_errors += 1;
                                    warn!("trace write failed: {}", e);
                                }
                            }
                        }
                        Err(e) => {
                            stats.write_errors += 1;
                            warn!("trace event serialization failed: {}", e);
                        }
                    }
                }

                if let Err(e) = writer.flush().await {
                    stats.write_errors += 1;
                    warn!("trace flush failed: {}", e);
                }

                if shutdown.load(Ordering::Acquire) && queue.is_empty() {
                    break;
                }
            }

            stats
        });

        self.writer_handle = Some(handle);
    }

    /// Get an emission handle for readers
    pub fn handle(&self) -> TraceHandle {
        TraceHandle {
            queue: Arc::clone(&self.queue),
            seq: Arc::clone(&self.seq),
            run_id: Arc::clone(&self.run_id),
        }
    }

    /// Request an immediate flush without shutting down
    pub fn flush(&self) {
        self.flush_notify.notify_one();
    }

    /// Drain remaining events, flush the file, and stop the writer
    pub async fn shutdown(mut self) -> Result<WriterStats> {
        self.shutdown.store(true, Ordering::Release);
        self.flush_notify.notify_one();

        let mut stats = match self.writer_handle.take() {
            Some(handle) => handle
                .await
                .map_err(|e| EngineError::RecordingFailed(format!("writer task failed: {e}")))?,
            None => WriterStats::default(),
        };

        stats.events_dropped = self.queue.stats().drop_count;
        info!(
            written = stats.events_written,
            dropped = stats.events_dropped,
            errors = stats.write_errors,
            "trace writer stopped"
        );

        Ok(stats)
    }
}

/// Writer statistics, returned on shutdown
#[derive(Debug, Clone, Default)]
pub struct WriterStats {
    /// Events written to the trace file
    pub events_written: u64,

    /// Events dropped at the queue (overflow)
    pub events_dropped: u64,

    /// Serialization or I/O failures
    pub write_errors: u64,
}
