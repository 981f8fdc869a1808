//! Library registry, the shared-state root
//!
//! Owns the M libraries and their locks. Every cross-reader interaction
//! goes through here; readers hold no shared state of their own. Each
//! operation touches exactly one library's lock, so contention on library A
//! never blocks library B. That per-library grain is the property the whole
//! simulation exists to exercise; do not coarsen it to one global lock or
//! split it into per-copy locks.

use crate::simulation::library::{BookState, Library};
use metrics::counter;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Registry of all libraries, shared across readers via `Arc`
pub struct LibraryRegistry {
    /// The libraries; index in the vec is the library id
    libraries: Vec<Library>,

    /// Book copies per library (K)
    books_per_library: usize,

    /// Successful checkouts across all libraries
    checkouts: AtomicU64,

    /// Checkins across all libraries
    checkins: AtomicU64,

    /// Checkout attempts that found every copy out
    refusals: AtomicU64,
}

impl LibraryRegistry {
    /// Create `libraries` libraries with `books_per_library` available
    /// copies each
    pub fn new(libraries: usize, books_per_library: usize) -> Self {
        debug!(libraries, books_per_library, "building library registry");

        Self {
            libraries: (0..libraries)
                .map(|index| Library::new(index, books_per_library))
                .collect(),
            books_per_library,
            checkouts: AtomicU64::new(0),
            checkins: AtomicU64::new(0),
            refusals: AtomicU64::new(0),
        }
    }

    /// Number of libraries (M)
    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }

    /// Book copies per library (K)
    pub fn books_per_library(&self) -> usize {
        self.books_per_library
    }

    /// Take the first available copy from one library
    ///
    /// Atomic per library; `None` means every copy is currently out.
    /// Counter updates happen after the library lock is released.
    pub fn checkout(&self, library: usize, reader: usize) -> Option<usize> {
        match self.libraries[library].checkout(reader) {
            Some(book) => {
                self.checkouts.fetch_add(1, Ordering::Relaxed);
                counter!("biblioteca_checkouts_total").increment(1);
                Some(book)
            }
            None => {
                self.refusals.fetch_add(1, Ordering::Relaxed);
                counter!("biblioteca_refusals_total").increment(1);
                None
            }
        }
    }

    /// Return a copy to one library
    ///
    /// Panics if `reader` is not the recorded holder of that copy: a
    /// caller contract violation, not a runtime condition.
    pub fn checkin(&self, library: usize, book: usize, reader: usize) {
        self.libraries[library].checkin(book, reader);
        self.checkins.fetch_add(1, Ordering::Relaxed);
        counter!("biblioteca_checkins_total").increment(1);
    }

    /// Copies currently checked out of one library
    pub fn checked_out_count(&self, library: usize) -> usize {
        self.libraries[library].checked_out_count()
    }

    /// Shelf snapshot of one library
    pub fn snapshot(&self, library: usize) -> Vec<BookState> {
        self.libraries[library].snapshot()
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            checkouts: self.checkouts.load(Ordering::Relaxed),
            checkins: self.checkins.load(Ordering::Relaxed),
            refusals: self.refusals.load(Ordering::Relaxed),
            checked_out_per_library: self
                .libraries
                .iter()
                .map(|library| library.checked_out_count())
                .collect(),
        }
    }
}

/// Registry statistics
#[derive(Debug, Clone)]
pub struct RegistryStats {
    /// Total successful checkouts
    pub checkouts: u64,

    /// Total checkins
    pub checkins: u64,

    /// Total refused checkout attempts
    pub refusals: u64,

    /// Copies currently out, per library
    pub checked_out_per_library: Vec<usize>,
}

impl RegistryStats {
    /// Copies currently out across all libraries
    pub fn total_checked_out(&self) -> usize {
        self.checked_out_per_library.iter().sum()
    }
}
