//! Trace event capture
//!
//! This module carries the simulation's own event stream, separate from
//! diagnostic logging:
//!
//! - **Event**: the trace event model (who/when/what)
//! - **Event Queue**: lock-free MPMC queue between readers and the writer
//! - **Trace Writer**: background task appending JSONL lines to the trace file
//!
//! Emission is a lock-free push and is never performed while a library lock
//! is held, so the collaborator's I/O latency can never stall the
//! simulation.

pub mod event;
pub mod event_queue;
pub mod trace_writer;

// Re-export commonly used types
pub use event::{TraceEvent, TraceEventKind};
pub use event_queue::{EventQueue, QueueStats};
pub use trace_writer::{TraceHandle, TraceRecorder, WriterStats};
