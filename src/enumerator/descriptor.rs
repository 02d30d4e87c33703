use serde::{Deserialize, Serialize};

/// Identifier of one remote document subject to search
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub key: String,
}

impl DocumentDescriptor {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// True if `key` ends with `suffix`, ignoring ASCII and Unicode case
#[must_use]
pub fn has_suffix(key: &str, suffix: &str) -> bool {
    key.to_lowercase().ends_with(&suffix.to_lowercase())
}
