//! Named counters for a cleaning run.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the host
//! process installs a recorder.

use std::fmt;

/// Every metric name the cleaner records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Validation
    ValidationRecordsTotal,
    ValidationRecordsValid,
    ValidationRecordsInvalid,

    // Deduplication
    DedupeGroupsFound,
    DedupeRecordsRemoved,

    // Runs
    RunsCompleted,
    RunsAborted,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ValidationRecordsTotal => "leads_validation_records_total",
            MetricName::ValidationRecordsValid => "leads_validation_records_valid_total",
            MetricName::ValidationRecordsInvalid => "leads_validation_records_invalid_total",
            MetricName::DedupeGroupsFound => "leads_dedupe_groups_found_total",
            MetricName::DedupeRecordsRemoved => "leads_dedupe_records_removed_total",
            MetricName::RunsCompleted => "leads_runs_completed_total",
            MetricName::RunsAborted => "leads_runs_aborted_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn emit_counter(name: MetricName, value: u64) {
    ::metrics::counter!(name.as_str()).increment(value);
}

pub mod validation {
    use super::{emit_counter, MetricName};
    use crate::pipeline::processing::validate::ValidationSummary;

    pub fn batch_validated(summary: &ValidationSummary) {
        emit_counter(MetricName::ValidationRecordsTotal, summary.total as u64);
        emit_counter(MetricName::ValidationRecordsValid, summary.valid as u64);
        emit_counter(MetricName::ValidationRecordsInvalid, summary.invalid as u64);
    }
}

pub mod dedupe {
    use super::{emit_counter, MetricName};
    use crate::pipeline::processing::dedupe::DedupeReport;

    pub fn batch_deduplicated(report: &DedupeReport) {
        emit_counter(MetricName::DedupeGroupsFound, report.groups.len() as u64);
        emit_counter(MetricName::DedupeRecordsRemoved, report.removed as u64);
    }
}

pub mod runs {
    use super::{emit_counter, MetricName};

    pub fn completed() {
        emit_counter(MetricName::RunsCompleted, 1);
    }

    pub fn aborted() {
        emit_counter(MetricName::RunsAborted, 1);
    }
}
