//! Lock-free trace event queue
//!
//! Bounded MPMC hand-off between the readers (producers) and the background
//! trace writer (consumer). A push is a single lock-free enqueue, so readers
//! can emit events without ever waiting on writer I/O. When the queue is
//! full the event is dropped and the loss counted.

use crate::recording::event::TraceEvent;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free bounded event queue
pub struct EventQueue {
    /// Underlying bounded queue
    queue: ArrayQueue<TraceEvent>,

    /// Push counter
    push_count: AtomicU64,

    /// Pop counter
    pop_count: AtomicU64,

    /// Drop counter (queue full)
    drop_count: AtomicU64,
}

impl EventQueue {
    /// Create a new event queue
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity),
            push_count: AtomicU64::new(0),
            pop_count: AtomicU64::new(0),
            drop_count: AtomicU64::new(0),
        }
    }

    /// Push an event (non-blocking, lock-free)
    ///
    /// Returns the event back when the queue is full; the caller decides
    /// whether the loss is worth logging.
    pub fn push(&self, event: TraceEvent) -> Result<(), TraceEvent> {
        match self.queue.push(event) {
            Ok(()) => {
                self.push_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(event) => {
                self.drop_count.fetch_add(1, Ordering::Relaxed);
                Err(event)
            }
        }
    }

    /// Try to pop an event (non-blocking)
    pub fn try_pop(&self) -> Option<TraceEvent> {
        let event = self.queue.pop()?;
        self.pop_count.fetch_add(1, Ordering::Relaxed);
        Some(event)
    }

    /// Get queue statistics
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            push_count: self.push_count.load(Ordering::Relaxed),
            pop_count: self.pop_count.load(Ordering::Relaxed),
            drop_count: self.drop_count.load(Ordering::Relaxed),
            current_size: self.queue.len(),
            capacity: self.queue.capacity(),
        }
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Get queue capacity
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

/// Queue statistics
#[derive(Debug, Clone)]
pub struct QueueStats {
    /// Total events pushed
    pub push_count: u64,

    /// Total events popped
    pub pop_count: u64,

    /// Total events dropped (queue full)
    pub drop_count: u64,

    /// Current queue size
    pub current_size: usize,

    /// Queue capacity
    pub capacity: usize,
}
