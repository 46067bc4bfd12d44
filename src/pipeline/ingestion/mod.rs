// Pipeline ingestion: loading the lead document and checking its shape

pub mod document;

pub use document::LeadDocument;
