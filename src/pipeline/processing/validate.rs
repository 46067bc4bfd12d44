use serde::Serialize;
use std::collections::BTreeMap;

use crate::app::ports::{ChangeEvent, EventSink};
use crate::constants::ID_FIELD;
use crate::domain::{Lead, RawLead};
use crate::pipeline::processing::schema::{validate_lead, FieldError};

/// Record counts for one validation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Result of validating a whole `leads` list
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Normalized leads, in input order
    pub valid: Vec<Lead>,
    /// Raw leads that failed, unmodified and in input order
    pub invalid: Vec<RawLead>,
    /// Failure reasons keyed by the record's position in the input list
    pub errors: BTreeMap<usize, Vec<FieldError>>,
    pub summary: ValidationSummary,
}

/// Applies the lead schema to every record and partitions the results
pub struct Validator<'a> {
    sink: &'a dyn EventSink,
}

impl<'a> Validator<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink }
    }

    /// Validate every lead. `None` means the document had no `leads` key and
    /// counts as zero records. Per-record failures never stop the batch.
    pub fn run(&self, leads: Option<&[RawLead]>) -> ValidationReport {
        self.sink.record_info("Starting record validation process");

        let Some(leads) = leads else {
            self.sink.record_info("No 'leads' key found in JSON data");
            return ValidationReport::default();
        };

        let total = leads.len();
        self.sink.record_info(&format!("Validating {} records", total));

        let mut report = ValidationReport::default();

        for (index, record) in leads.iter().enumerate() {
            let label = record_label(index, record);
            match validate_lead(record) {
                Ok(lead) => {
                    self.sink.record_info(&format!("{} - VALID", label));
                    report.valid.push(lead);
                }
                Err(errors) => {
                    self.sink.record_change(
                        &ChangeEvent::new("Record validation failed")
                            .from_value(label)
                            .to_value("INVALID")
                            .context(format!("Errors: {}", join_errors(&errors))),
                    );
                    report.invalid.push(record.clone());
                    report.errors.insert(index, errors);
                }
            }
        }

        report.summary = ValidationSummary {
            total,
            valid: report.valid.len(),
            invalid: report.invalid.len(),
        };

        self.sink.record_info(&format!(
            "Validation completed: {} valid, {} invalid out of {} records",
            report.summary.valid, report.summary.invalid, report.summary.total
        ));

        if report.summary.invalid > 0 {
            self.sink.record_info(&format!(
                "Invalid records found: {} records have validation errors",
                report.summary.invalid
            ));
            for (index, errors) in &report.errors {
                self.sink.record_info(&format!(
                    "{} errors: {}",
                    record_label(*index, &leads[*index]),
                    join_errors(errors)
                ));
            }
        }

        report
    }
}

/// `Record <n> (ID: <id>)` with a one-based record number
fn record_label(index: usize, record: &RawLead) -> String {
    let id = match record.get(ID_FIELD) {
        Some(serde_json::Value::String(id)) => id.clone(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    };
    format!("Record {} (ID: {})", index + 1, id)
}

pub fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
