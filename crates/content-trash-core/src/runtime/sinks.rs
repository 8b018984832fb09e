// crates/content-trash-core/src/runtime/sinks.rs
// ============================================================================
// Module: Content Trash Event Sinks
// Description: JSON-lines event sinks for stderr, files, memory, and no-op.
// Purpose: Route structured trash events without a hard logging dependency.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! Each event is serialized as one JSON line. Write failures are dropped so
//! logging never fails the operation that produced the event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::events::TrashEvent;
use crate::interfaces::TrashEventSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Event sink writing JSON lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrEventSink;

impl TrashEventSink for StderrEventSink {
    fn record(&self, event: &TrashEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Event sink appending JSON lines to a file.
pub struct FileEventSink {
    /// Log file handle.
    file: Mutex<File>,
}

impl FileEventSink {
    /// Opens (or creates) the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl TrashEventSink for FileEventSink {
    fn record(&self, event: &TrashEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
        }
    }
}

/// Event sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl TrashEventSink for NoopEventSink {
    fn record(&self, _event: &TrashEvent) {}
}

/// Event sink that keeps events in memory for inspection.
#[derive(Debug, Default, Clone)]
pub struct MemoryEventSink {
    /// Recorded events.
    events: Arc<Mutex<Vec<TrashEvent>>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<TrashEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the names of the recorded events in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl TrashEventSink for MemoryEventSink {
    fn record(&self, event: &TrashEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
