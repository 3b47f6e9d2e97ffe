//! Query log sinks.
//!
//! A builder with a sink attached records one [`LogEntry`] per terminal call,
//! as long as the sink reports itself enabled.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

use crate::Bindings;

/// One executed statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// The statement as sent, with named placeholders
    pub query: String,
    /// The statement with literal values substituted. For display only.
    pub query_with_bindings: String,
    pub bindings: Bindings,
    /// Execution time in seconds
    pub time: f64,
}

impl LogEntry {
    pub fn new(sql: &str, bindings: &Bindings, elapsed: Duration) -> Self {
        Self {
            query: sql.to_string(),
            query_with_bindings: bindings.substitute(sql),
            bindings: bindings.clone(),
            time: elapsed.as_secs_f64(),
        }
    }
}

/// Sink for executed statements
pub trait QueryLog: Send + Sync {
    fn record(&self, entry: LogEntry);

    /// Disabled sinks are skipped without building an entry
    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    enabled: bool,
    entries: Vec<LogEntry>,
}

/// Collects entries in memory while enabled. Starts disabled.
#[derive(Debug, Default)]
pub struct MemoryQueryLog {
    state: Mutex<MemoryState>,
}

impl MemoryQueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self) {
        self.lock().enabled = true;
    }

    pub fn disable(&self) {
        self.lock().enabled = false;
    }

    /// Hand out everything collected so far, then clear and disable the log.
    ///
    /// A second call right after returns an empty list.
    pub fn take(&self) -> Vec<LogEntry> {
        let mut state = self.lock();
        state.enabled = false;
        std::mem::take(&mut state.entries)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl QueryLog for MemoryQueryLog {
    fn record(&self, entry: LogEntry) {
        let mut state = self.lock();
        if state.enabled {
            state.entries.push(entry);
        }
    }

    fn is_enabled(&self) -> bool {
        self.lock().enabled
    }
}

/// Emits every entry as a `tracing` info event on target `querent::query_log`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingQueryLog;

impl QueryLog for TracingQueryLog {
    fn record(&self, entry: LogEntry) {
        tracing::info!(
            target: "querent::query_log",
            query = %entry.query,
            query_with_bindings = %entry.query_with_bindings,
            bind_count = entry.bindings.len(),
            time = entry.time,
        );
    }
}
