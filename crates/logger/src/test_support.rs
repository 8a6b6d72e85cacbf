//! Test support utilities
//!
//! This module provides a backend that captures records in memory so tests
//! can assert on exactly what a logger emitted. It's only available when the
//! `test-support` feature is enabled.

use crate::{Backend, Record};
use std::sync::{Arc, Mutex, MutexGuard};

/// A backend that keeps every rendered record in memory.
///
/// Clones share the same storage, so a test can hand one clone to a logger
/// and inspect another.
#[derive(Debug, Clone, Default)]
pub struct CaptureBackend {
    records: Arc<Mutex<Vec<Record>>>,
}

impl CaptureBackend {
    /// Create an empty capture backend
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        // A panicking test thread must not hide the records from the others
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// All captured records, oldest first
    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    /// The text of every captured record, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    /// Number of captured records
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether any captured record's text contains `text`
    pub fn contains(&self, text: &str) -> bool {
        self.lock().iter().any(|r| r.message.contains(text))
    }

    /// Drop all captured records
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Backend for CaptureBackend {
    fn render(&self, record: Record) {
        self.lock().push(record);
    }
}
