//! Result types returned by the search orchestrator
//!
//! Serialised field names match the JSON the web client consumes
//! (`fileName`, `subtitleText`, `totalCount`, `isPartial`).

use serde::{Deserialize, Serialize};

/// One matched subtitle line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Key of the document the line came from
    pub file_name: String,
    /// Trimmed text of the preceding non-empty line, usually the timing marker
    pub timestamp: String,
    pub subtitle_text: String,
}

/// Aggregated outcome of one query
///
/// `total_count` always equals `occurrences.len()`; when the quota, the
/// hard cap or the request budget cut the search short, `is_partial` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub occurrences: Vec<Occurrence>,
    pub total_count: usize,
    pub is_partial: bool,
    /// Documents fetched and scanned successfully
    pub documents_scanned: usize,
    /// Documents skipped after a fetch error or timeout
    pub documents_failed: usize,
}
