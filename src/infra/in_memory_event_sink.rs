use std::sync::{Mutex, PoisonError};

use crate::app::ports::{ChangeEvent, EventSink};

/// Event sink that keeps every line in memory, for tests and dry runs
#[derive(Default)]
pub struct InMemoryEventSink {
    lines: Mutex<Vec<String>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded line, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines().iter().any(|l| l == line)
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

impl EventSink for InMemoryEventSink {
    fn record_info(&self, message: &str) {
        self.push(message.to_string());
    }

    fn record_change(&self, change: &ChangeEvent) {
        self.push(change.to_string());
    }
}
