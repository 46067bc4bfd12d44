// Pipeline processing: field rules, validation, and duplicate removal

pub mod dedupe;
pub mod schema;
pub mod validate;

pub use dedupe::{DedupeKey, DedupeReport, Deduplicator, DuplicateGroup};
pub use schema::{validate_lead, FieldError, ValidationOutcome};
pub use validate::{ValidationReport, ValidationSummary, Validator};
