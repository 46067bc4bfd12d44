use tracing::info;

use crate::app::ports::{ChangeEvent, EventSink};

/// Forwards audit events to `tracing`, which fans them out to the console and log file
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn record_info(&self, message: &str) {
        info!("{}", message);
    }

    fn record_change(&self, change: &ChangeEvent) {
        info!(
            action = %change.action,
            from = change.from.as_deref(),
            to = change.to.as_deref(),
            "{}",
            change
        );
    }
}
