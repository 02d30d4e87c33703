//! Substring search over remote subtitle documents
//!
//! The orchestrator drives enumeration, the worker pool and the retrying
//! fetcher; the matcher turns one document body into occurrences.

pub mod errors;
pub mod matcher;
pub mod orchestrator;
pub mod types;

pub use errors::{ErrorKind, SearchError, SearchResult};
pub use matcher::scan_document;
pub use orchestrator::SearchOrchestrator;
pub use types::{Occurrence, SearchOutcome};
