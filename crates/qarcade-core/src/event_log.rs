//! Bounded, process-wide console log.
//!
//! Entries are evicted oldest-first once the log reaches capacity. Each
//! append is also mirrored to the `log` facade at debug level so operators
//! see the same stream in their logs.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Capacity used when none is configured.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// One timestamped console line.
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl std::fmt::Display for EventLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// FIFO-evicting append log.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<EventLogEntry>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    /// Create a log holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, evicting the oldest entry if full.
    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("console: {message}");
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(EventLogEntry {
            timestamp: Local::now(),
            message,
        });
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &EventLogEntry> {
        self.entries.iter()
    }

    /// Rendered `[HH:MM:SS] message` lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
