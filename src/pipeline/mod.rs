// Data processing pipeline: document ingestion, then validation and deduplication

pub mod ingestion;
pub mod processing;

pub use ingestion::LeadDocument;
