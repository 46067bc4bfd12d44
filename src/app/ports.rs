use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::pipeline::processing::validate::ValidationSummary;

/// Audit trail for a cleaning run.
///
/// The core writes human-readable events here instead of a global logger so it
/// can run without file or console side effects.
pub trait EventSink: Send + Sync {
    /// Record a plain informational event
    fn record_info(&self, message: &str);

    /// Record a change, optionally with the value it moved from and to
    fn record_change(&self, change: &ChangeEvent);
}

/// A change event: an action plus optional from/to values and free-text context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub action: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub context: String,
}

impl ChangeEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            from: None,
            to: None,
            context: String::new(),
        }
    }

    pub fn from_value(mut self, value: impl Into<String>) -> Self {
        self.from = Some(value.into());
        self
    }

    pub fn to_value(mut self, value: impl Into<String>) -> Self {
        self.to = Some(value.into());
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => write!(f, " from '{}' to '{}'", from, to)?,
            (Some(from), None) => write!(f, " from '{}'", from)?,
            (None, Some(to)) => write!(f, " to '{}'", to)?,
            (None, None) => {}
        }
        if !self.context.is_empty() {
            write!(f, " ({})", self.context)?;
        }
        Ok(())
    }
}

/// Reads and writes whole JSON documents
pub trait DocumentStorePort: Send + Sync {
    fn load(&self, path: &Path) -> Result<Value>;

    /// Must not leave a partially written document at `path` on failure
    fn save(&self, path: &Path, document: &Value) -> Result<()>;
}

/// The continue/abort gate consulted when some records failed validation
pub trait ConfirmationPort: Send + Sync {
    /// `Ok(true)` to continue with only the valid records, `Ok(false)` to abort
    fn confirm_continue(&self, summary: &ValidationSummary) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_with_both_values_and_context() {
        let change = ChangeEvent::new("Kept record with duplicate _id")
            .from_value("index 0")
            .to_value("index 3")
            .context("kept last occurrence: 2015-01-01T00:00:00+00:00");
        assert_eq!(
            change.to_string(),
            "Kept record with duplicate _id from 'index 0' to 'index 3' (kept last occurrence: 2015-01-01T00:00:00+00:00)"
        );
    }

    #[test]
    fn test_change_event_with_one_side_only() {
        assert_eq!(ChangeEvent::new("Dropped").from_value("a").to_string(), "Dropped from 'a'");
        assert_eq!(ChangeEvent::new("Set").to_value("b").to_string(), "Set to 'b'");
        assert_eq!(ChangeEvent::new("Touched").to_string(), "Touched");
    }
}
