use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::app::ports::{ConfirmationPort, DocumentStorePort, EventSink};
use crate::error::{CleanerError, Result};
use crate::observability::metrics;
use crate::pipeline::ingestion::LeadDocument;
use crate::pipeline::processing::dedupe::Deduplicator;
use crate::pipeline::processing::validate::{ValidationReport, ValidationSummary, Validator};

/// Where to read from and write to for one cleaning run
#[derive(Debug, Clone)]
pub struct CleanRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Optional report of the records that failed validation
    pub rejected: Option<PathBuf>,
}

/// Counts for a run that wrote its output document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub validation: ValidationSummary,
    pub original_count: usize,
    pub final_count: usize,
    pub removed_invalid: usize,
    pub removed_duplicates: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    Completed(CleanSummary),
    /// The operator declined to continue after invalid records were found.
    /// Nothing was written except the rejected report, if requested.
    Aborted(ValidationSummary),
}

/// Load, validate, gate, deduplicate, save
pub struct CleanLeadsUseCase {
    store: Box<dyn DocumentStorePort>,
    confirmation: Box<dyn ConfirmationPort>,
    sink: Arc<dyn EventSink>,
}

impl CleanLeadsUseCase {
    pub fn new(
        store: Box<dyn DocumentStorePort>,
        confirmation: Box<dyn ConfirmationPort>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            confirmation,
            sink,
        }
    }

    pub fn run(&self, request: &CleanRequest) -> Result<CleanOutcome> {
        let span = info_span!("clean_run", run_id = %Uuid::new_v4());
        let _enter = span.enter();

        let sink = &*self.sink;
        sink.record_info("Starting JSON processing");
        sink.record_info(&format!("Input file: {}", request.input.display()));
        sink.record_info(&format!("Output file: {}", request.output.display()));

        if !request.input.exists() {
            return Err(CleanerError::MissingInput(request.input.clone()));
        }

        let document = LeadDocument::from_value(self.store.load(&request.input)?)?;
        info!("Loaded {} leads", document.lead_count());

        sink.record_info("Step 1: Validating records");
        let report = Validator::new(sink).run(document.leads());
        metrics::validation::batch_validated(&report.summary);

        if let Some(path) = &request.rejected {
            self.store.save(path, &rejected_document(&report))?;
            sink.record_info(&format!("Rejected records saved to: {}", path.display()));
        }

        if report.summary.invalid > 0 {
            warn!(
                "{} of {} records failed validation",
                report.summary.invalid, report.summary.total
            );
            if !self.confirmation.confirm_continue(&report.summary)? {
                sink.record_info("Process cancelled by user due to invalid records");
                metrics::runs::aborted();
                return Ok(CleanOutcome::Aborted(report.summary));
            }
            sink.record_info(&format!(
                "Updated data to {} valid records",
                report.summary.valid
            ));
        }

        sink.record_info("Step 2: Deduplicating records");
        let deduped = Deduplicator::new(sink).run(&report.valid);
        metrics::dedupe::batch_deduplicated(&deduped);

        let output = document.with_leads(&deduped.kept)?;
        self.store.save(&request.output, &output)?;

        let summary = CleanSummary {
            validation: report.summary,
            original_count: report.summary.total,
            final_count: deduped.kept.len(),
            removed_invalid: report.summary.invalid,
            removed_duplicates: deduped.removed,
            output: request.output.clone(),
        };

        sink.record_info("Processing completed successfully");
        sink.record_info(&format!(
            "Final records: {} (original {}, removed {})",
            summary.final_count,
            summary.original_count,
            summary.original_count - summary.final_count
        ));
        sink.record_info(&format!("Data saved to: {}", request.output.display()));
        metrics::runs::completed();

        Ok(CleanOutcome::Completed(summary))
    }
}

/// `{"rejected": [{"index", "record", "errors"}]}` with zero-based input positions
fn rejected_document(report: &ValidationReport) -> Value {
    let rejected: Vec<Value> = report
        .errors
        .iter()
        .zip(&report.invalid)
        .map(|((index, errors), record)| {
            json!({
                "index": index,
                "record": record,
                "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "rejected": rejected })
}
