//! Biblioteca Simulation Engine Library
//!
//! This library simulates a population of concurrent readers contending
//! for a finite pool of book copies spread across independently locked
//! libraries.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **simulation**: libraries, registry, readers, orchestration
//! - **recording**: lock-free trace event capture and the JSONL writer
//! - **observability**: tracing and metrics initialization
//! - **utils**: configuration and error types
//!
//! # Model
//!
//! N readers each start at library `id % M` and walk the libraries in
//! circular order. At each stop a reader takes the first available of K
//! book copies, holds it for a randomized interval, returns it, and moves
//! on, until it has completed K successful cycles or arrives at a library
//! with nothing on the shelf, in which case it gives up for good. The
//! per-library lock is the only synchronization; readers share no other
//! state.

// Public module exports
pub mod observability;
pub mod recording;
pub mod simulation;
pub mod utils;

// Re-export commonly used types
pub use recording::{TraceEvent, TraceEventKind, TraceHandle, TraceRecorder};
pub use simulation::{
    LibraryRegistry, Orchestrator, Reader, ReaderOutcome, RegistryStats, SimulationReport,
};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
