pub mod confirmation_adapter;
pub mod in_memory_event_sink;
pub mod json_document_store_adapter;
pub mod tracing_event_sink_adapter;

pub use confirmation_adapter::{print_counts, AssumeYesConfirmation, ConsoleConfirmation};
pub use in_memory_event_sink::InMemoryEventSink;
pub use json_document_store_adapter::JsonFileDocumentStore;
pub use tracing_event_sink_adapter::TracingEventSink;
