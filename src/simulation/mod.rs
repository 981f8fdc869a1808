//! Reader/library contention simulation
//!
//! The core of the engine: N readers circularly traverse M libraries of K
//! book copies each, checking out, holding, and checking in books under
//! per-library mutual exclusion.
//!
//! - **Library**: K copies behind one exclusive lock (the leaf)
//! - **Registry**: owns the M libraries; the only shared mutable state
//! - **Hold**: pluggable, seedable hold-duration strategies
//! - **Reader**: one reader's circular-traversal state machine
//! - **Orchestrator**: fan-out, join, reporting, best-effort shutdown
//!
//! # Architecture
//!
//! ```text
//! Orchestrator
//!     │ spawns N
//!     ▼
//! Reader tasks ──── checkout / checkin ────► LibraryRegistry
//!     │                                       ├─ Library 0 (lock, K copies)
//!     │ emit (lock-free)                      ├─ Library 1 (lock, K copies)
//!     ▼                                       └─ Library M-1 ...
//! Trace pipeline
//! ```
//!
//! Locks are per-library: contention on one library never blocks another,
//! and nothing finer than the whole shelf is ever locked, so the
//! first-available scan is atomic by construction.

pub mod hold;
pub mod library;
pub mod orchestrator;
pub mod reader;
pub mod registry;

// Re-export commonly used types
pub use hold::{FixedHold, HoldPolicy, UniformHold};
pub use library::{BookState, Library};
pub use orchestrator::{Orchestrator, SimulationReport};
pub use reader::{Reader, ReaderOutcome};
pub use registry::{LibraryRegistry, RegistryStats};
