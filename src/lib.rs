pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod pipeline;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

// Domain data shapes shared across layers
pub mod domain;

pub use app::clean_use_case::{CleanLeadsUseCase, CleanOutcome, CleanRequest, CleanSummary};
pub use domain::{Lead, RawLead};
pub use error::{CleanerError, Result};
