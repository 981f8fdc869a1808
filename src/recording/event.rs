//! Trace event model
//!
//! Every state transition a reader makes is captured as a discrete event:
//! who (reader id), when (UTC timestamp plus a monotonic sequence number
//! assigned at emission), and what (the kind, with library/book indices
//! where relevant). The sequence number gives a total emission order even
//! when wall-clock timestamps collide, which is what makes interleavings
//! reconstructable from the trace file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trace event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Monotonic sequence number within the run
    pub seq: u64,

    /// Simulation run ID (ULID)
    pub run_id: String,

    /// Emitting reader (0..N-1)
    pub reader: usize,

    /// Wall-clock timestamp at emission
    pub timestamp: DateTime<Utc>,

    /// What happened
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// Trace event kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// Reader arrived at its starting library
    ReaderStarted { library: usize },

    /// Reader is about to contend for the library's lock
    CheckoutRequested { library: usize },

    /// Reader took a book copy
    BookCheckedOut { library: usize, book: usize },

    /// Reader returned a book copy
    BookReturned { library: usize, book: usize },

    /// Reader moved on to the next library in its circuit
    MovedToLibrary { library: usize },

    /// Reader found no available book and gave up
    Abandoned { library: usize },

    /// Reader finished its full cycle target
    Completed { cycles: usize },
}

impl TraceEventKind {
    /// Library index this event concerns, if any
    pub fn library(&self) -> Option<usize> {
        match self {
            TraceEventKind::ReaderStarted { library }
            | TraceEventKind::CheckoutRequested { library }
            | TraceEventKind::BookCheckedOut { library, .. }
            | TraceEventKind::BookReturned { library, .. }
            | TraceEventKind::MovedToLibrary { library }
            | TraceEventKind::Abandoned { library } => Some(*library),
            TraceEventKind::Completed { .. } => None,
        }
    }
}
