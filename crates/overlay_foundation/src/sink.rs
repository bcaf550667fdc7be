//! Logging sinks for recovered faults.
//!
//! The merge engine never fails a whole merge because of one property; it
//! reports the fault to a [`LogSink`] instead. The default sink forwards to
//! `tracing`, which is silent unless the host installs a subscriber.

use std::sync::Mutex;

use crate::value::Value;

/// Receiver for diagnostic messages and value dumps.
pub trait LogSink: Send + Sync {
    /// Logs a message.
    fn log(&self, message: &str);

    /// Dumps a value for inspection.
    fn dump(&self, label: &str, value: &Value);
}

/// Forwards messages to `tracing` under the `overlay` target.
///
/// Messages are `warn` events; dumps are `debug` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::warn!(target: "overlay", "{message}");
    }

    fn dump(&self, label: &str, value: &Value) {
        tracing::debug!(target: "overlay", label, value = ?value, "dump");
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _message: &str) {}

    fn dump(&self, _label: &str, _value: &Value) {}
}

/// An entry captured by a [`MemorySink`].
#[derive(Clone, Debug, PartialEq)]
pub enum LogEntry {
    /// A logged message.
    Message(String),
    /// A dumped value.
    Dump {
        /// What was dumped.
        label: String,
        /// The value at the time of the dump.
        value: Value,
    },
}

/// Keeps every entry in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every captured entry.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Returns only the logged messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Message(message) => Some(message.clone()),
                LogEntry::Dump { .. } => None,
            })
            .collect()
    }

    /// Returns the labels of the dumped values.
    #[must_use]
    pub fn dump_labels(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Dump { label, .. } => Some(label.clone()),
                LogEntry::Message(_) => None,
            })
            .collect()
    }

    /// Removes every captured entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        // A poisoned log is still a log.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn log(&self, message: &str) {
        self.lock().push(LogEntry::Message(message.to_string()));
    }

    fn dump(&self, label: &str, value: &Value) {
        self.lock().push(LogEntry::Dump {
            label: label.to_string(),
            value: value.clone(),
        });
    }
}
