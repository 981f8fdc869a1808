//! A single library of book copies
//!
//! The leaf of the shared state: K interchangeable copies behind one
//! exclusive lock. Every state transition of a copy happens inside that
//! lock; the critical section is the O(K) first-available scan or the
//! single-slot checkin, nothing more. The simulated reading time never
//! happens in here.

use parking_lot::Mutex;
use tracing::trace;

/// State of one book copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// On the shelf, free to take
    Available,

    /// Taken by a reader; the holder is recorded so checkin can enforce
    /// the ownership contract
    CheckedOut { reader: usize },
}

/// A library holding K book copies under one exclusive lock
pub struct Library {
    /// Library index (0..M-1)
    index: usize,

    /// Book copies; index within the vec is the book id
    books: Mutex<Vec<BookState>>,
}

impl Library {
    /// Create a library with `copies` available books
    pub fn new(index: usize, copies: usize) -> Self {
        Self {
            index,
            books: Mutex::new(vec![BookState::Available; copies]),
        }
    }

    /// Library index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of book copies (K)
    pub fn capacity(&self) -> usize {
        self.books.lock().len()
    }

    /// Take the first available copy, scanning in ascending book order
    ///
    /// Atomic with respect to every other checkout/checkin on this library.
    /// Returns `None` when every copy is out; the caller treats that as a
    /// normal outcome, not an error.
    pub fn checkout(&self, reader: usize) -> Option<usize> {
        let book = {
            let mut books = self.books.lock();
            let book = books
                .iter()
                .position(|state| *state == BookState::Available)?;
            books[book] = BookState::CheckedOut { reader };
            book
        };

        trace!(library = self.index, book, reader, "book checked out");
        Some(book)
    }

    /// Return a copy previously taken by `reader`
    ///
    /// The caller must be the recorded holder of exactly this copy.
    /// Violations are programming errors and panic rather than corrupting
    /// shelf state.
    pub fn checkin(&self, book: usize, reader: usize) {
        let mut books = self.books.lock();

        match books[book] {
            BookState::CheckedOut { reader: holder } if holder == reader => {
                books[book] = BookState::Available;
            }
            BookState::CheckedOut { reader: holder } => panic!(
                "reader {reader} returned book {book} of library {} held by reader {holder}",
                self.index
            ),
            BookState::Available => panic!(
                "reader {reader} returned book {book} of library {} that is not checked out",
                self.index
            ),
        }

        drop(books);
        trace!(library = self.index, book, reader, "book returned");
    }

    /// Number of copies currently checked out
    pub fn checked_out_count(&self) -> usize {
        self.books
            .lock()
            .iter()
            .filter(|state| matches!(state, BookState::CheckedOut { .. }))
            .count()
    }

    /// Snapshot of the shelf
    pub fn snapshot(&self) -> Vec<BookState> {
        self.books.lock().clone()
    }
}
